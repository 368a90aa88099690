use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;

use super::style::Theme;

pub fn render_status_bar(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let cursor = model.document.buffer().cursor();
    let position = format!("Ln {}, Col {} ", cursor.line + 1, cursor.col + 1);
    let modified = if model.document.is_modified() {
        "[modified]  "
    } else {
        ""
    };

    let right_width = position.width() + modified.width();
    let left_room = usize::from(area.width).saturating_sub(right_width + 1);
    let left: String = format!(" {}", model.status)
        .chars()
        .scan(0, |used, ch| {
            *used += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            (*used <= left_room).then_some(ch)
        })
        .collect();
    let gap = usize::from(area.width).saturating_sub(left.width() + right_width);

    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(gap)),
        Span::styled(modified, theme.modified),
        Span::raw(position),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.bar), area);
}
