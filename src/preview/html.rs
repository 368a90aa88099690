//! HTML to preview blocks.
//!
//! The HTML is parsed into a DOM with html5ever and walked once. Unknown
//! elements are transparent: their children are rendered in place.
//! Elements nested deeper than [`MAX_NESTING`] are flattened to plain text.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::types::{Alignment, Block, InlineSpan, InlineStyle};

/// Deepest element nesting the walk descends into.
pub const MAX_NESTING: usize = 64;

/// Parse an HTML fragment into preview blocks.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut blocks = Vec::new();
    collect_blocks(&dom.document, 0, &mut blocks);
    blocks
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

fn attribute(handle: &Handle, wanted: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == wanted)
        .map(|attr| attr.value.to_string())
}

fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "dd"
            | "details"
            | "div"
            | "dl"
            | "dt"
            | "figure"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "html"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "ul"
    )
}

fn is_skipped(name: &str) -> bool {
    matches!(
        name,
        "head" | "script" | "style" | "title" | "template" | "noscript"
    )
}

/// Walk the children of a container, grouping loose inline content into
/// paragraphs between block elements.
fn collect_blocks(handle: &Handle, depth: usize, out: &mut Vec<Block>) {
    let mut pending = Vec::new();
    if depth >= MAX_NESTING {
        pending.push(InlineSpan::plain(flat_text(handle)));
        flush_paragraph(&mut pending, out);
        return;
    }
    for child in handle.children.borrow().iter() {
        match element_name(child) {
            Some(name) if is_skipped(&name) => {}
            Some(name) if is_block_element(&name) => {
                flush_paragraph(&mut pending, out);
                block_element(child, &name, depth + 1, out);
            }
            _ => collect_inline(child, InlineStyle::default(), depth + 1, &mut pending),
        }
    }
    flush_paragraph(&mut pending, out);
}

fn flush_paragraph(pending: &mut Vec<InlineSpan>, out: &mut Vec<Block>) {
    let spans = std::mem::take(pending);
    if spans.iter().any(|span| !span.text().trim().is_empty()) {
        out.push(Block::Paragraph(spans));
    }
}

fn block_element(handle: &Handle, name: &str, depth: usize, out: &mut Vec<Block>) {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse().unwrap_or(1);
            out.push(Block::Heading {
                level,
                spans: inline_children(handle, InlineStyle::default(), depth),
            });
        }
        "p" | "dt" | "summary" => {
            let mut spans = inline_children(handle, InlineStyle::default(), depth);
            flush_paragraph(&mut spans, out);
        }
        "pre" => out.push(code_block(handle)),
        "blockquote" => {
            let mut inner = Vec::new();
            collect_blocks(handle, depth, &mut inner);
            out.push(Block::Quote(inner));
        }
        "ul" | "ol" => out.push(list(handle, name == "ol", depth)),
        "table" => out.push(table(handle, depth)),
        "hr" => out.push(Block::Rule),
        _ => collect_blocks(handle, depth, out),
    }
}

fn inline_children(handle: &Handle, style: InlineStyle, depth: usize) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in handle.children.borrow().iter() {
        collect_inline(child, style, depth + 1, &mut spans);
    }
    spans
}

fn collect_inline(
    handle: &Handle,
    style: InlineStyle,
    depth: usize,
    out: &mut Vec<InlineSpan>,
) {
    if depth >= MAX_NESTING {
        out.push(InlineSpan::new(flat_text(handle), style));
        return;
    }
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if style.code {
                out.push(InlineSpan::new(text.replace('\n', " "), style));
            } else {
                out.push(InlineSpan::new(collapse_whitespace(&text), style));
            }
        }
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref().to_ascii_lowercase();
            if is_skipped(&tag) {
                return;
            }
            let mut child_style = style;
            match tag.as_str() {
                "strong" | "b" => child_style.bold = true,
                "em" | "i" => child_style.italic = true,
                "code" | "kbd" | "samp" => child_style.code = true,
                "del" | "s" | "strike" => child_style.strike = true,
                "a" => child_style.link = true,
                "br" => {
                    out.push(InlineSpan::new("\n", style));
                    return;
                }
                "img" => {
                    let alt = attribute(handle, "alt").unwrap_or_default();
                    out.push(InlineSpan::new(format!("[image: {alt}]"), style));
                    return;
                }
                _ => {}
            }
            for child in handle.children.borrow().iter() {
                collect_inline(child, child_style, depth + 1, out);
            }
        }
        _ => {}
    }
}

/// Collapse runs of HTML whitespace to one space.
fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(ch);
            in_space = false;
        }
    }
    collapsed
}

/// Concatenated text of a subtree, with whitespace kept verbatim.
///
/// Walks with an explicit stack so arbitrarily deep markup is fine.
fn raw_text(handle: &Handle, out: &mut String) {
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => match element_name(&node).as_deref() {
                Some("br") => out.push('\n'),
                Some(name) if is_skipped(name) => {}
                _ => stack.extend(node.children.borrow().iter().rev().cloned()),
            },
            _ => stack.extend(node.children.borrow().iter().rev().cloned()),
        }
    }
}

/// Text of a subtree too deeply nested to walk, as one line of prose.
fn flat_text(handle: &Handle) -> String {
    let mut text = String::new();
    raw_text(handle, &mut text);
    collapse_whitespace(&text)
}

fn code_block(pre: &Handle) -> Block {
    let language = pre
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child).as_deref() == Some("code"))
        .and_then(|code| attribute(code, "class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .map(str::to_string)
        });
    let mut text = String::new();
    raw_text(pre, &mut text);
    if text.ends_with('\n') {
        text.pop();
    }
    Block::Code { language, text }
}

fn list(handle: &Handle, ordered: bool, depth: usize) -> Block {
    let start = ordered.then(|| {
        attribute(handle, "start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1)
    });
    let items = handle
        .children
        .borrow()
        .iter()
        .filter(|child| element_name(child).as_deref() == Some("li"))
        .map(|li| {
            let mut blocks = Vec::new();
            collect_blocks(li, depth + 1, &mut blocks);
            blocks
        })
        .collect();
    Block::List { start, items }
}

fn alignment(cell: &Handle) -> Alignment {
    let align = attribute(cell, "align").or_else(|| {
        attribute(cell, "style").and_then(|style| {
            style
                .split(';')
                .find_map(|decl| decl.trim().strip_prefix("text-align:"))
                .map(|value| value.trim().to_string())
        })
    });
    match align.as_deref() {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        _ => Alignment::Left,
    }
}

fn collect_rows(handle: &Handle, rows: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        match element_name(child).as_deref() {
            Some("tr") => rows.push(child.clone()),
            Some("thead" | "tbody" | "tfoot") => collect_rows(child, rows),
            _ => {}
        }
    }
}

fn cell_text(cell: &Handle, depth: usize) -> String {
    inline_children(cell, InlineStyle::default(), depth)
        .iter()
        .map(InlineSpan::text)
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}

fn table(handle: &Handle, depth: usize) -> Block {
    let mut row_handles = Vec::new();
    collect_rows(handle, &mut row_handles);

    let mut alignments = Vec::new();
    let mut header = Vec::new();
    let mut rows = Vec::new();
    for (index, row) in row_handles.iter().enumerate() {
        let cells: Vec<Handle> = row
            .children
            .borrow()
            .iter()
            .filter(|child| matches!(element_name(child).as_deref(), Some("th" | "td")))
            .cloned()
            .collect();
        let is_header = index == 0
            && !cells.is_empty()
            && cells
                .iter()
                .all(|cell| element_name(cell).as_deref() == Some("th"));
        if is_header || alignments.is_empty() {
            alignments = cells.iter().map(alignment).collect();
        }
        let texts: Vec<String> = cells
            .iter()
            .map(|cell| cell_text(cell, depth + 2))
            .collect();
        if is_header {
            header = texts;
        } else {
            rows.push(texts);
        }
    }

    Block::Table {
        alignments,
        header,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[InlineSpan]) -> String {
        spans.iter().map(InlineSpan::text).collect()
    }

    #[test]
    fn test_heading_block() {
        let blocks = parse_blocks("<h1>Title</h1>\n");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Heading { level, spans } => {
                assert_eq!(*level, 1);
                assert_eq!(text_of(spans), "Title");
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn test_paragraph_inline_styles() {
        let blocks = parse_blocks("<p>plain <strong>bold</strong> <em>it</em> <code>x</code></p>");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(text_of(spans), "plain bold it x");
        let bold = spans.iter().find(|s| s.text() == "bold").unwrap();
        assert!(bold.style().bold);
        let italic = spans.iter().find(|s| s.text() == "it").unwrap();
        assert!(italic.style().italic);
        let code = spans.iter().find(|s| s.text() == "x").unwrap();
        assert!(code.style().code);
    }

    #[test]
    fn test_soft_breaks_collapse_to_spaces() {
        let blocks = parse_blocks("<p>one\ntwo   three</p>");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(text_of(spans), "one two three");
    }

    #[test]
    fn test_code_block_keeps_text_and_language() {
        let blocks = parse_blocks(
            "<pre><code class=\"language-rust\">fn main() {\n    code();\n}\n</code></pre>",
        );
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: Some("rust".to_string()),
                text: "fn main() {\n    code();\n}".to_string(),
            }]
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let blocks = parse_blocks("<pre><code>code\n</code></pre>");
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: None,
                text: "code".to_string(),
            }]
        );
    }

    #[test]
    fn test_lists() {
        let blocks = parse_blocks("<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n<ul><li>c</li></ul>");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            Block::List { start, items } => {
                assert_eq!(*start, Some(3));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected list, got {other:?}"),
        }
        assert!(matches!(&blocks[1], Block::List { start: None, items } if items.len() == 1));
    }

    #[test]
    fn test_table_header_rows_and_alignment() {
        let html = "<table>\n<thead>\n<tr>\n<th>a</th>\n<th align=\"right\">b</th>\n</tr>\n</thead>\n\
                    <tbody>\n<tr>\n<td>1</td>\n<td align=\"right\">2</td>\n</tr>\n</tbody>\n</table>";
        let blocks = parse_blocks(html);
        assert_eq!(
            blocks,
            vec![Block::Table {
                alignments: vec![Alignment::Left, Alignment::Right],
                header: vec!["a".to_string(), "b".to_string()],
                rows: vec![vec!["1".to_string(), "2".to_string()]],
            }]
        );
    }

    #[test]
    fn test_blockquote_nests_blocks() {
        let blocks = parse_blocks("<blockquote>\n<p>quoted</p>\n</blockquote>");
        match &blocks[0] {
            Block::Quote(inner) => assert!(matches!(inner[0], Block::Paragraph(_))),
            other => panic!("expected quote, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_elements_are_transparent() {
        let blocks = parse_blocks("<div><span>inside</span></div><script>ignored()</script>");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(text_of(spans), "inside");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_rule_and_break() {
        let blocks = parse_blocks("<p>a<br>b</p><hr>");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(text_of(spans), "a\nb");
        assert_eq!(blocks[1], Block::Rule);
    }

    fn quote_depth(blocks: &[Block]) -> usize {
        let mut depth = 0;
        let mut current = blocks;
        while let Some(Block::Quote(inner)) = current.first() {
            depth += 1;
            current = inner;
        }
        depth
    }

    #[test]
    fn test_deep_blockquotes_are_flattened() {
        let html = "<blockquote>".repeat(20_000) + "deep";
        let blocks = parse_blocks(&html);
        let depth = quote_depth(&blocks);
        assert!(depth > 0 && depth < MAX_NESTING);

        let mut innermost = blocks.as_slice();
        while let Some(Block::Quote(inner)) = innermost.first() {
            innermost = inner;
        }
        match innermost {
            [Block::Paragraph(spans)] => assert_eq!(text_of(spans).trim(), "deep"),
            other => panic!("expected flattened paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_lists_are_bounded() {
        let html = "<ul><li>".repeat(5_000) + "leaf";
        let blocks = parse_blocks(&html);
        assert!(matches!(&blocks[0], Block::List { .. }));
    }

    #[test]
    fn test_deep_inline_markup_keeps_text() {
        let html = format!("<p>{}inner</p>", "<span>".repeat(20_000));
        let blocks = parse_blocks(&html);
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(text_of(spans), "inner");
    }

    #[test]
    fn test_empty_html_has_no_blocks() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("\n\n").is_empty());
    }
}
