//! Syntax highlighting for fenced code in the preview.
//!
//! Uses syntect with its bundled Sublime Text syntaxes and themes. The
//! language comes from the `language-*` class comrak puts on `<code>`.

use std::sync::{OnceLock, RwLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::preview::{InlineColor, InlineSpan, InlineStyle};

/// Terminal background the preview colors are tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: RwLock<Option<Background>> = RwLock::new(None);

/// Force a background, or `None` to detect it from `COLORFGBG`.
pub fn set_background(mode: Option<Background>) {
    if let Ok(mut guard) = BACKGROUND_OVERRIDE.write() {
        *guard = mode;
    }
}

/// The background in effect.
pub fn background() -> Background {
    if let Some(mode) = BACKGROUND_OVERRIDE.read().ok().and_then(|guard| *guard) {
        return mode;
    }
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// Highlight `code` line by line.
///
/// Unknown or missing languages produce uncolored code spans. The result has
/// one entry per line of `code`.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<InlineSpan>> {
    let code_style = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    let syntax_set = syntax_set();
    let syntax = language.and_then(|lang| {
        syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| syntax_set.find_syntax_by_name(lang))
    });

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| vec![InlineSpan::new(line, code_style)])
            .collect();
    };

    let mode = background();
    let mut highlighter = HighlightLines::new(syntax, theme(mode));
    code.lines()
        .map(|line| {
            let Ok(ranges) = highlighter.highlight_line(line, syntax_set) else {
                return vec![InlineSpan::new(line, code_style)];
            };
            ranges
                .into_iter()
                .map(|(style, text)| {
                    let fg = InlineColor {
                        r: style.foreground.r,
                        g: style.foreground.g,
                        b: style.foreground.b,
                    };
                    let inline = InlineStyle {
                        fg: Some(adjust_fg_for_background(fg, mode)),
                        ..code_style
                    };
                    InlineSpan::new(text, inline)
                })
                .collect()
        })
        .collect()
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme(mode: Background) -> &'static Theme {
    static THEMES: OnceLock<(Theme, Theme)> = OnceLock::new();
    let (dark, light) = THEMES.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        let pick = |preferred: &[&str]| {
            preferred
                .iter()
                .find_map(|name| theme_set.themes.get(*name))
                .or_else(|| theme_set.themes.values().next())
                .cloned()
                .unwrap_or_default()
        };
        (
            pick(&["base16-eighties.dark", "base16-ocean.dark", "Solarized (dark)"]),
            pick(&["InspiredGitHub", "base16-ocean.light", "Solarized (light)"]),
        )
    });
    match mode {
        Background::Dark => dark,
        Background::Light => light,
    }
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(bg) if bg >= 7 => Background::Light,
        _ => Background::Dark,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn adjust_fg_for_background(color: InlineColor, mode: Background) -> InlineColor {
    if mode == Background::Dark {
        return color;
    }
    let luma = 0.0722f32.mul_add(
        f32::from(color.b),
        0.2126f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
    );
    if luma < 155.0 {
        return color;
    }
    let dim = |c: u8| (f32::from(c) * 0.42).round() as u8;
    InlineColor {
        r: dim(color.r),
        g: dim(color.g),
        b: dim(color.b),
    }
}
