//! The read-only HTML preview pane.
//!
//! [`Preview`] holds the HTML produced from the buffer, the blocks parsed
//! from it and a scroll offset. Layout happens lazily per pane width and is
//! cached until the HTML or the width changes.

mod html;
mod layout;
mod types;

pub use html::parse_blocks;
pub use layout::layout;
pub use types::{
    Alignment, Block, InlineColor, InlineSpan, InlineStyle, LineKind, RenderedLine,
};

#[derive(Debug, Clone, Default)]
pub struct Preview {
    html: String,
    blocks: Vec<Block>,
    scroll: usize,
    cache: Option<(u16, Vec<RenderedLine>)>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed content with `html`.
    ///
    /// Nothing of the previous content survives. The scroll offset is kept
    /// so that typing does not jump the view; it is clamped on next render.
    pub fn set_html(&mut self, html: String) {
        self.blocks = parse_blocks(&html);
        self.html = html;
        self.cache = None;
    }

    /// The HTML currently displayed.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Rows of the preview laid out for `width` columns.
    pub fn lines(&mut self, width: u16) -> &[RenderedLine] {
        let fresh = matches!(&self.cache, Some((cached, _)) if *cached == width);
        if !fresh {
            self.cache = Some((width, layout(&self.blocks, width)));
        }
        self.cache
            .as_ref()
            .map_or(&[][..], |(_, lines)| lines.as_slice())
    }

    pub const fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub const fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub const fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    pub const fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Keep the last page of content on screen.
    pub fn clamp_scroll(&mut self, width: u16, height: u16) {
        let max = self.lines(width).len().saturating_sub(usize::from(height));
        self.scroll = self.scroll.min(max);
    }
}
