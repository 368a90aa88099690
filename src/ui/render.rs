use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::input::MENUS;

use super::style::Theme;
use super::{MAX_SPLIT_PERCENT, MIN_SPLIT_PERCENT, overlays, status};

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub menu_bar: Rect,
    pub editor: Rect,
    /// Bordered preview pane, border included
    pub preview: Rect,
    pub status: Rect,
}

/// Split the screen into menu bar, editor, preview and status line.
pub fn screen_layout(area: Rect, split_percent: u16) -> ScreenLayout {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);
    let split = split_percent.clamp(MIN_SPLIT_PERCENT, MAX_SPLIT_PERCENT);
    let columns = Layout::horizontal([
        Constraint::Percentage(split),
        Constraint::Percentage(100 - split),
    ])
    .split(rows[1]);
    ScreenLayout {
        menu_bar: rows[0],
        editor: columns[0],
        preview: columns[1],
        status: rows[2],
    }
}

/// Display width of a buffer char; tabs are drawn as one space.
pub fn char_display_width(ch: char) -> usize {
    if ch == '\t' {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = screen_layout(area, model.split_percent);
    let theme = Theme::current();

    render_menu_bar(model, &theme, frame, layout.menu_bar);
    render_editor(model, &theme, frame, layout.editor);
    render_preview(model, &theme, frame, layout.preview);
    status::render_status_bar(model, &theme, frame, layout.status);

    if let Some(state) = model.menu {
        overlays::render_menu_dropdown(model, &theme, state, frame);
    }
    if let Some(dialog) = &model.dialog {
        overlays::render_dialog(dialog, &theme, frame, area);
    }
}

fn render_menu_bar(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (index, menu) in MENUS.iter().enumerate() {
        let open = model.menu.is_some_and(|state| state.menu == index);
        let style = if open {
            theme.bar_selected
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", menu.title), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.bar), area);
}

fn render_editor(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let buffer = model.document.buffer();
    let total_lines = buffer.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = usize::from(area.width.saturating_sub(gutter_width + 1));
    let cursor = buffer.cursor();
    let show_cursor = model.dialog.is_none();

    let start = model.editor_scroll;
    let end = (start + usize::from(area.height)).min(total_lines);
    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let text = buffer.line_at(line_idx).unwrap_or_default();
        let number = format!("{:>width$} ", line_idx + 1, width = usize::from(gutter_width));
        let mut spans = vec![Span::styled(number, theme.gutter)];
        let cursor_col = (show_cursor && line_idx == cursor.line).then_some(cursor.col);
        spans.extend(editor_line_spans(
            &text,
            model.editor_hscroll,
            text_width,
            cursor_col,
            theme.cursor,
        ));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Visible part of one buffer line, with the cursor cell styled.
fn editor_line_spans(
    text: &str,
    hscroll: usize,
    width: usize,
    cursor_col: Option<usize>,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    let mut before = String::new();
    let mut at_cursor: Option<String> = None;
    let mut after = String::new();
    let mut col = 0;

    for (index, ch) in text.chars().enumerate() {
        let ch_width = char_display_width(ch);
        let start = col;
        col += ch_width;
        if start < hscroll {
            continue;
        }
        if start - hscroll + ch_width > width {
            break;
        }
        let shown = if ch == '\t' { ' ' } else { ch };
        match cursor_col {
            Some(c) if index == c => at_cursor = Some(shown.to_string()),
            Some(c) if index > c => after.push(shown),
            _ => before.push(shown),
        }
    }
    if cursor_col.is_some_and(|c| c >= text.chars().count()) {
        at_cursor = Some(" ".to_string());
    }

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    if let Some(cell) = at_cursor {
        spans.push(Span::styled(cell, cursor_style));
    }
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

fn render_preview(model: &mut Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(theme.gutter);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    model.preview.clamp_scroll(inner.width, inner.height);
    let offset = model.preview.scroll_offset();
    let lines: Vec<Line> = model
        .preview
        .lines(inner.width)
        .iter()
        .skip(offset)
        .take(usize::from(inner.height))
        .map(|line| theme.line(line))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
