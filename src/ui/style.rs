//! Theming and color definitions.
//!
//! Preview content uses ANSI colors that adapt to the terminal's palette;
//! syntax highlighted code uses RGB, downgraded to the 256 color cube when
//! the terminal has no truecolor support.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::highlight::Background;
use crate::preview::{InlineColor, InlineStyle, LineKind, RenderedLine};

/// Colors for one terminal background.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Heading styles, level 1 to 4+
    pub headings: [Style; 4],
    /// Code block text without highlighting
    pub code: Style,
    pub inline_code: Style,
    pub link: Style,
    /// Bullets, quote bars, table rules
    pub marker: Style,
    pub hr: Style,
    pub table_header: Style,
    /// Menu bar and status line
    pub bar: Style,
    /// Highlighted menu title or entry
    pub bar_selected: Style,
    pub gutter: Style,
    pub cursor: Style,
    pub dialog: Style,
    pub modified: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Theme for the background currently in effect.
    pub fn current() -> Self {
        match crate::highlight::background() {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        }
    }

    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self {
            headings: [
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Indexed(245)),
            inline_code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            marker: Style::default().fg(Color::Yellow),
            hr: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::DIM),
            table_header: Style::default().add_modifier(Modifier::BOLD),
            bar: Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::Indexed(252)),
            bar_selected: Style::default().bg(Color::Blue).fg(Color::White),
            gutter: Style::default().fg(Color::DarkGray),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            dialog: Style::default().bg(Color::Black).fg(Color::White),
            modified: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            headings: [
                Style::default()
                    .fg(Color::Indexed(24))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Indexed(22))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Indexed(58))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Indexed(54))
                    .add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Indexed(238)),
            inline_code: Style::default()
                .fg(Color::Indexed(88))
                .add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            marker: Style::default().fg(Color::Indexed(136)),
            hr: Style::default().fg(Color::Indexed(245)),
            table_header: Style::default().add_modifier(Modifier::BOLD),
            bar: Style::default()
                .bg(Color::Indexed(252))
                .fg(Color::Indexed(235)),
            bar_selected: Style::default().bg(Color::Indexed(25)).fg(Color::White),
            gutter: Style::default().fg(Color::Indexed(245)),
            cursor: Style::default().bg(Color::Black).fg(Color::White),
            dialog: Style::default().bg(Color::Indexed(254)).fg(Color::Black),
            modified: Style::default()
                .fg(Color::Indexed(130))
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Base style of a preview row.
    pub fn style_for_line_kind(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Heading(level) => {
                let index = usize::from(level.clamp(1, 4)) - 1;
                let style = self.headings[index];
                if level == 1 {
                    style.add_modifier(Modifier::UNDERLINED)
                } else {
                    style
                }
            }
            LineKind::Code => self.code,
            LineKind::TableHeader => self.table_header,
            LineKind::Rule => self.hr,
            LineKind::Body | LineKind::Table | LineKind::Empty => Style::default(),
        }
    }

    /// Merge an inline span's formatting into a row's base style.
    pub fn style_for_inline(&self, base: Style, inline: InlineStyle) -> Style {
        if inline.marker {
            return base
                .patch(self.marker)
                .remove_modifier(Modifier::UNDERLINED);
        }

        let mut style = base;
        if let Some(fg) = inline.fg {
            style = style
                .fg(fg_color_for_terminal(fg))
                .remove_modifier(Modifier::DIM);
        }
        if inline.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if inline.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if inline.strike {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if inline.link && inline.fg.is_none() {
            style = style.patch(self.link);
        }
        if inline.code && inline.fg.is_none() && base != self.code {
            style = style.patch(self.inline_code);
        }
        style
    }

    /// Convert a laid-out preview row into a styled ratatui line.
    pub fn line(&self, line: &RenderedLine) -> Line<'static> {
        let base = self.style_for_line_kind(line.kind());
        let spans: Vec<Span<'static>> = line
            .spans()
            .iter()
            .map(|span| {
                Span::styled(
                    span.text().to_string(),
                    self.style_for_inline(base, span.style()),
                )
            })
            .collect();
        Line::from(spans)
    }
}

fn fg_color_for_terminal(fg: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("MARKSPLIT_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}
