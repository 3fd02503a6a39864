//! Plain-text format: the document with all markup removed.
//!
//! Links keep their target in parentheses when it differs from the link text, images
//! become their local path. Serialization only.

use crate::error::Result;
use crate::format::Format;
use crate::ir::nodes::{inline_plain_text, DocNode, Document, InlineContent, List};

pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text without markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String> {
        let mut out = render_nodes(&doc.children);
        out.push('\n');
        Ok(out)
    }
}

fn render_nodes(nodes: &[DocNode]) -> String {
    nodes
        .iter()
        .map(render_node)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_node(node: &DocNode) -> String {
    match node {
        DocNode::Heading(heading) => inline_text(&heading.content),
        DocNode::Paragraph(paragraph) => inline_text(&paragraph.content),
        DocNode::List(list) => {
            let mut lines = Vec::new();
            render_list(list, &mut lines);
            lines.join("\n")
        }
        DocNode::BlockQuote(quote) => render_nodes(&quote.children)
            .lines()
            .map(|line| format!("    {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        DocNode::CodeBlock(code) => code.content.trim_end_matches('\n').to_string(),
        DocNode::Image(image) if image.alt.is_empty() => image.src.clone(),
        DocNode::Image(image) => format!("{}: {}", image.alt, image.src),
        DocNode::ThematicBreak => "----".to_string(),
        DocNode::Markdown(raw) => raw.content.trim_end().to_string(),
    }
}

fn render_list(list: &List, lines: &mut Vec<String>) {
    let indent = "  ".repeat(list.depth);
    for (index, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            format!("{}. ", list.start + index)
        } else {
            "- ".to_string()
        };
        lines.push(format!("{indent}{marker}{}", inline_text(&item.content)));
        for child in &item.children {
            match child {
                DocNode::List(nested) => render_list(nested, lines),
                other => lines.push(format!("{indent}  {}", render_node(other))),
            }
        }
    }
}

fn inline_text(content: &[InlineContent]) -> String {
    let mut out = String::new();
    for inline in content {
        match inline {
            InlineContent::Link { url, content } => {
                let text = inline_plain_text(content);
                if text == *url {
                    out.push_str(&text);
                } else {
                    out.push_str(&format!("{text} ({url})"));
                }
            }
            other => other.push_plain_text(&mut out),
        }
    }
    out
}
