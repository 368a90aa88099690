//! Lay preview blocks out as terminal rows.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Alignment, Block, InlineSpan, InlineStyle, LineKind, RenderedLine};
use crate::highlight::highlight_code;

const QUOTE_MARKER: &str = "│ ";
const BULLET: &str = "• ";
const COLUMN_SEPARATOR: &str = " │ ";

/// Lay out `blocks` for a pane `width` columns wide.
///
/// Blocks are separated by one empty row. Prose is word wrapped; code rows
/// are kept whole and left for the renderer to clip.
pub fn layout(blocks: &[Block], width: u16) -> Vec<RenderedLine> {
    let mut lines = Vec::new();
    layout_blocks(blocks, usize::from(width).max(1), &mut lines);
    lines
}

fn layout_blocks(blocks: &[Block], width: usize, out: &mut Vec<RenderedLine>) {
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            out.push(RenderedLine::empty());
        }
        layout_block(block, width, out);
    }
}

fn layout_block(block: &Block, width: usize, out: &mut Vec<RenderedLine>) {
    match block {
        Block::Heading { level, spans } => {
            let kind = LineKind::Heading(*level);
            let wrapped = wrap(spans, width);
            let underline_width = wrapped
                .iter()
                .map(|line| line.iter().map(|s| s.text().width()).sum::<usize>())
                .max()
                .unwrap_or(0)
                .clamp(1, width);
            out.extend(wrapped.into_iter().map(|spans| RenderedLine::new(kind, spans)));
            let rule = match level {
                1 => Some('═'),
                2 => Some('─'),
                _ => None,
            };
            if let Some(ch) = rule {
                let text: String = std::iter::repeat_n(ch, underline_width).collect();
                out.push(RenderedLine::new(kind, vec![marker(text)]));
            }
        }
        Block::Paragraph(spans) => {
            out.extend(
                wrap(spans, width)
                    .into_iter()
                    .map(|spans| RenderedLine::new(LineKind::Body, spans)),
            );
        }
        Block::Code { language, text } => {
            let highlighted = highlight_code(language.as_deref(), text);
            if highlighted.is_empty() {
                out.push(RenderedLine::new(LineKind::Code, Vec::new()));
            }
            out.extend(
                highlighted
                    .into_iter()
                    .map(|spans| RenderedLine::new(LineKind::Code, spans)),
            );
        }
        Block::Quote(inner) => {
            let mut nested = Vec::new();
            layout_blocks(inner, width.saturating_sub(QUOTE_MARKER.width()).max(1), &mut nested);
            for mut line in nested {
                line.prepend(marker(QUOTE_MARKER));
                out.push(line);
            }
        }
        Block::List { start, items } => {
            for (index, item) in items.iter().enumerate() {
                let bullet = start.map_or_else(
                    || BULLET.to_string(),
                    |n| format!("{}. ", n.saturating_add(index as u64)),
                );
                layout_list_item(item, &bullet, width, out);
            }
        }
        Block::Table {
            alignments,
            header,
            rows,
        } => layout_table(alignments, header, rows, width, out),
        Block::Rule => {
            let text: String = std::iter::repeat_n('─', width).collect();
            out.push(RenderedLine::new(LineKind::Rule, vec![marker(text)]));
        }
    }
}

fn layout_list_item(item: &[Block], bullet: &str, width: usize, out: &mut Vec<RenderedLine>) {
    let indent = bullet.width();
    let mut nested = Vec::new();
    layout_blocks(item, width.saturating_sub(indent).max(1), &mut nested);
    if nested.is_empty() {
        nested.push(RenderedLine::new(LineKind::Body, Vec::new()));
    }
    for (row, mut line) in nested.into_iter().enumerate() {
        if row == 0 {
            line.prepend(marker(bullet));
        } else {
            line.prepend(InlineSpan::plain(" ".repeat(indent)));
        }
        out.push(line);
    }
}

fn marker(text: impl Into<String>) -> InlineSpan {
    InlineSpan::new(
        text,
        InlineStyle {
            marker: true,
            ..InlineStyle::default()
        },
    )
}

/// A run of non-whitespace text, possibly mixing styles.
struct Word {
    parts: Vec<InlineSpan>,
    space_before: bool,
    break_before: bool,
}

impl Word {
    fn width(&self) -> usize {
        self.parts.iter().map(|part| part.text().width()).sum()
    }
}

fn split_words(spans: &[InlineSpan]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;
    let mut space = false;
    let mut hard_break = false;
    for span in spans {
        for ch in span.text().chars() {
            if ch == '\n' {
                words.extend(current.take());
                hard_break = true;
                space = false;
            } else if ch == ' ' || ch == '\t' {
                words.extend(current.take());
                space = true;
            } else {
                let word = current.get_or_insert_with(|| Word {
                    parts: Vec::new(),
                    space_before: std::mem::take(&mut space),
                    break_before: std::mem::take(&mut hard_break),
                });
                match word.parts.last_mut() {
                    Some(last) if last.style() == span.style() => last.push_char(ch),
                    _ => word.parts.push(InlineSpan::new(ch.to_string(), span.style())),
                }
            }
        }
    }
    words.extend(current);
    words
}

/// Style for the space between two words: only what both sides share.
fn shared_style(left: Option<&InlineSpan>, right: Option<&InlineSpan>) -> InlineStyle {
    let (Some(left), Some(right)) = (left, right) else {
        return InlineStyle::default();
    };
    let (a, b) = (left.style(), right.style());
    InlineStyle {
        bold: a.bold && b.bold,
        italic: a.italic && b.italic,
        code: a.code && b.code,
        strike: a.strike && b.strike,
        link: a.link && b.link,
        marker: false,
        fg: None,
    }
}

/// Word wrap inline spans to `width` columns.
///
/// Always returns at least one (possibly empty) row. Words wider than the
/// pane are broken at character boundaries.
fn wrap(spans: &[InlineSpan], width: usize) -> Vec<Vec<InlineSpan>> {
    let mut lines: Vec<Vec<InlineSpan>> = vec![Vec::new()];
    let mut used = 0;
    for word in split_words(spans) {
        let word_width = word.width();
        let overflows = used > 0 && used + usize::from(word.space_before) + word_width > width;
        if word.break_before || overflows {
            lines.push(Vec::new());
            used = 0;
        } else if used > 0 && word.space_before {
            if let Some(line) = lines.last_mut() {
                let style = shared_style(line.last(), word.parts.first());
                line.push(InlineSpan::new(" ", style));
            }
            used += 1;
        }

        if word_width <= width {
            if let Some(line) = lines.last_mut() {
                line.extend(word.parts);
            }
            used += word_width;
            continue;
        }

        for part in word.parts {
            for ch in part.text().chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used > 0 && used + ch_width > width {
                    lines.push(Vec::new());
                    used = 0;
                }
                if let Some(line) = lines.last_mut() {
                    match line.last_mut() {
                        Some(last) if last.style() == part.style() => last.push_char(ch),
                        _ => line.push(InlineSpan::new(ch.to_string(), part.style())),
                    }
                }
                used += ch_width;
            }
        }
    }
    lines
}

fn layout_table(
    alignments: &[Alignment],
    header: &[String],
    rows: &[Vec<String>],
    width: usize,
    out: &mut Vec<RenderedLine>,
) {
    let columns = rows.iter().map(Vec::len).fold(header.len(), usize::max);
    if columns == 0 {
        return;
    }

    let mut widths = vec![1; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.width());
        }
    }
    let separators = COLUMN_SEPARATOR.width() * (columns - 1);
    while widths.iter().sum::<usize>() + separators > width {
        let widest = widths
            .iter()
            .enumerate()
            .max_by_key(|(_, w)| **w)
            .map(|(index, w)| (index, *w));
        match widest {
            Some((index, w)) if w > 1 => widths[index] -= 1,
            _ => break,
        }
    }

    let row_line = |cells: &[String], kind: LineKind| {
        let mut spans = Vec::new();
        for (index, column_width) in widths.iter().enumerate() {
            if index > 0 {
                spans.push(marker(COLUMN_SEPARATOR));
            }
            let cell = cells.get(index).map_or("", String::as_str);
            let align = alignments.get(index).copied().unwrap_or_default();
            spans.push(InlineSpan::plain(fit_cell(cell, *column_width, align)));
        }
        RenderedLine::new(kind, spans)
    };

    if !header.is_empty() {
        out.push(row_line(header, LineKind::TableHeader));
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        out.push(RenderedLine::new(LineKind::Table, vec![marker(rule)]));
    }
    for row in rows {
        out.push(row_line(row, LineKind::Table));
    }
}

fn fit_cell(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate(text, width);
    let pad = width.saturating_sub(text.width());
    match align {
        Alignment::Left => format!("{text}{}", " ".repeat(pad)),
        Alignment::Right => format!("{}{text}", " ".repeat(pad)),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(pad - left))
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut truncated = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        truncated.push(ch);
        used += ch_width;
    }
    truncated.push('…');
    truncated
}
