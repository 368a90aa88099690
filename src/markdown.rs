//! Markdown to HTML conversion.
//!
//! Conversion is delegated to comrak with a fixed rule set: CommonMark
//! (which includes fenced code blocks) plus the GFM table extension. Raw
//! HTML in the source is passed through to the output. Conversion is
//! total: any input, well-formed or not, produces some HTML.

use comrak::{Options, markdown_to_html};

/// Convert markdown source to an HTML fragment.
///
/// # Example
///
/// ```
/// let html = marksplit::markdown::to_html("# Title");
/// assert!(html.contains("<h1>Title</h1>"));
/// ```
pub fn to_html(source: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.render.unsafe_ = true;
    markdown_to_html(source, &options)
}
