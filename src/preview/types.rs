//! Display types shared by the HTML walker and the line layout.

/// An RGB color, used for syntax highlighted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Inline formatting picked up from HTML elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub strike: bool,
    pub link: bool,
    /// Decoration added by the layout (bullets, quote bars, table rules).
    pub marker: bool,
    pub fg: Option<InlineColor>,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }

    pub(super) fn push_char(&mut self, ch: char) {
        self.text.push(ch);
    }
}

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A block-level element of the previewed HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph(Vec<InlineSpan>),
    Code {
        language: Option<String>,
        text: String,
    },
    Quote(Vec<Block>),
    List {
        /// Start number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Table {
        alignments: Vec<Alignment>,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
}

/// Kind of a laid-out preview line; drives its base style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Body,
    Code,
    Table,
    TableHeader,
    Rule,
    Empty,
}

/// One terminal row of the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    kind: LineKind,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(kind: LineKind, spans: Vec<InlineSpan>) -> Self {
        Self { kind, spans }
    }

    pub const fn empty() -> Self {
        Self::new(LineKind::Empty, Vec::new())
    }

    pub const fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn spans(&self) -> &[InlineSpan] {
        &self.spans
    }

    /// Plain text of the line.
    pub fn content(&self) -> String {
        self.spans.iter().map(InlineSpan::text).collect()
    }

    pub(super) fn prepend(&mut self, span: InlineSpan) {
        self.spans.insert(0, span);
    }
}
