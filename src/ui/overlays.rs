use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::{Dialog, MenuState, Model, PathPrompt};
use crate::input::{MENUS, menu_title_spans};

use super::style::Theme;

/// Area of the drop-down for menu `menu`, directly under its title.
pub fn menu_dropdown_rect(model: &Model, menu: usize) -> Rect {
    let (x, _) = menu_title_spans().get(menu).copied().unwrap_or((1, 0));
    let items = MENUS.get(menu).map_or(&[][..], |m| m.items);
    let content = items
        .iter()
        .map(|item| item.label.width() + 3 + model.shortcut_label(item.command).width())
        .max()
        .unwrap_or(0);
    #[allow(clippy::cast_possible_truncation)]
    let (width, height) = ((content + 4) as u16, (items.len() + 2) as u16);
    let (screen_width, screen_height) = model.size;
    Rect::new(x, 1, width, height).intersection(Rect::new(0, 0, screen_width, screen_height))
}

/// Index of the entry under `pos`, if any.
pub fn menu_item_at(dropdown: Rect, menu: usize, pos: Position) -> Option<usize> {
    let inside = pos.x > dropdown.x
        && pos.x + 1 < dropdown.x + dropdown.width
        && pos.y > dropdown.y
        && pos.y + 1 < dropdown.y + dropdown.height;
    if !inside {
        return None;
    }
    let index = usize::from(pos.y - dropdown.y - 1);
    let count = MENUS.get(menu).map_or(0, |m| m.items.len());
    (index < count).then_some(index)
}

pub fn render_menu_dropdown(model: &Model, theme: &Theme, state: MenuState, frame: &mut Frame) {
    let Some(menu) = MENUS.get(state.menu) else {
        return;
    };
    let popup = menu_dropdown_rect(model, state.menu);
    let inner_width = usize::from(popup.width.saturating_sub(2));

    let lines: Vec<Line> = menu
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let shortcut = model.shortcut_label(item.command);
            let gap = inner_width.saturating_sub(item.label.width() + shortcut.width() + 2);
            let text = format!(" {}{}{} ", item.label, " ".repeat(gap), shortcut);
            if index == state.item {
                Line::styled(text, theme.bar_selected)
            } else {
                Line::raw(text)
            }
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).style(theme.dialog);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_dialog(dialog: &Dialog, theme: &Theme, frame: &mut Frame, area: Rect) {
    match dialog {
        Dialog::Prompt(prompt) => render_prompt(prompt, theme, frame, area),
        Dialog::Confirm { name, .. } => {
            let lines = vec![
                Line::raw(format!("Save changes to {name}?")),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("[Y]", theme.modified),
                    Span::raw("es  "),
                    Span::styled("[N]", theme.modified),
                    Span::raw("o  "),
                    Span::styled("[C]", theme.modified),
                    Span::raw("ancel"),
                ]),
            ];
            let width = (name.width() + 24).max(36);
            render_box("Unsaved changes", lines, width, theme, frame, area);
        }
        Dialog::Notice { title, message } => {
            let mut lines: Vec<Line> = message.lines().map(Line::raw).collect();
            lines.push(Line::raw(""));
            lines.push(Line::styled("Press any key", theme.gutter));
            let width = message.lines().map(UnicodeWidthStr::width).max().unwrap_or(0) + 6;
            render_box(title, lines, width.clamp(30, 72), theme, frame, area);
        }
    }
}

fn render_prompt(prompt: &PathPrompt, theme: &Theme, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).clamp(20, 72);
    // border + padding on each side, plus the cursor cell
    let room = usize::from(popup_width.saturating_sub(5));
    let skip = prompt.input.chars().count().saturating_sub(room);
    let visible: String = prompt.input.chars().skip(skip).collect();

    let lines = vec![
        Line::raw("Path:"),
        Line::from(vec![Span::raw(visible), Span::styled(" ", theme.cursor)]),
        Line::raw(""),
        Line::styled("Enter: confirm  Esc: cancel", theme.gutter),
    ];
    render_box(
        prompt.title(),
        lines,
        usize::from(popup_width),
        theme,
        frame,
        area,
    );
}

/// Draw a bordered, padded box centered in `area`.
fn render_box(
    title: &str,
    lines: Vec<Line<'_>>,
    width: usize,
    theme: &Theme,
    frame: &mut Frame,
    area: Rect,
) {
    let popup_width = u16::try_from(width).unwrap_or(u16::MAX);
    let inner_width = usize::from(popup_width.saturating_sub(4)).max(1);
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let popup_height = u16::try_from(rows + 2).unwrap_or(u16::MAX);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(theme.dialog);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
