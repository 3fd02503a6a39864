//! Markdown serialization (IR → Markdown export)
//!
//! The serializer is written by hand instead of going through comrak's CommonMark
//! renderer: the output must reproduce post text byte for byte, and comrak escapes
//! punctuation and rewrites autolinks. Nothing here escapes text.
//!
//! Layout rules:
//! - top-level blocks are separated by exactly one blank line
//! - list items of one list, and their nested lists, are contiguous
//! - a list is indented by `depth * 2` spaces
//! - every line of a block quote is prefixed with `> `

use crate::error::Result;
use crate::ir::nodes::{Document, DocNode, InlineContent, List};

/// Serialize an IR document to Markdown, with a trailing newline.
pub fn serialize_to_markdown(doc: &Document) -> Result<String> {
    let mut out = render_nodes(&doc.children);
    out.push('\n');
    Ok(out)
}

/// Renders a block sequence, one blank line between blocks, no trailing newline.
pub fn render_nodes(nodes: &[DocNode]) -> String {
    nodes
        .iter()
        .map(render_node)
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_node(node: &DocNode) -> String {
    match node {
        DocNode::Heading(heading) => format!(
            "{} {}",
            "#".repeat(heading.level.clamp(1, 6)),
            render_inlines(&heading.content)
        ),
        DocNode::Paragraph(paragraph) => render_inlines(&paragraph.content),
        DocNode::List(list) => {
            let mut lines = Vec::new();
            render_list(list, &mut lines);
            lines.join("\n")
        }
        DocNode::BlockQuote(quote) => prefix_lines(&render_nodes(&quote.children), "> "),
        DocNode::CodeBlock(code) => {
            let fence = code_fence(&code.content);
            format!(
                "{fence}{}\n{}\n{fence}",
                code.language.as_deref().unwrap_or(""),
                code.content.trim_end_matches('\n')
            )
        }
        DocNode::Image(image) => format!("![{}]({})", image.alt, image.src),
        DocNode::ThematicBreak => "---".to_string(),
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
        let continuation = format!("{indent}{}", " ".repeat(marker.len()));
        let text = render_inlines(&item.content);
        let mut item_lines = text.split('\n');
        lines.push(format!(
            "{indent}{marker}{}",
            item_lines.next().unwrap_or_default()
        ));
        lines.extend(item_lines.map(|line| format!("{continuation}{line}")));

        let mut previous_was_list = false;
        for child in &item.children {
            match child {
                DocNode::List(nested) => {
                    // Sibling lists are kept apart by a blank line
                    if previous_was_list {
                        lines.push(String::new());
                    }
                    render_list(nested, lines);
                }
                other => lines.extend(
                    render_node(other)
                        .split('\n')
                        .map(|line| format!("{continuation}{line}")),
                ),
            }
            previous_was_list = matches!(child, DocNode::List(_));
        }
    }
}

/// Renders inline content to a Markdown fragment.
pub fn render_inlines(content: &[InlineContent]) -> String {
    let mut out = String::new();
    for inline in content {
        push_inline(inline, &mut out);
    }
    out
}

fn push_inline(inline: &InlineContent, out: &mut String) {
    match inline {
        InlineContent::Text(text) => out.push_str(text),
        InlineContent::Bold(children) => {
            out.push_str("**");
            children.iter().for_each(|child| push_inline(child, out));
            out.push_str("**");
        }
        InlineContent::Italic(children) => {
            out.push('*');
            children.iter().for_each(|child| push_inline(child, out));
            out.push('*');
        }
        InlineContent::Code(code) => {
            let ticks = "`".repeat(longest_backtick_run(code) + 1);
            if ticks.len() > 1 {
                out.push_str(&format!("{ticks} {code} {ticks}"));
            } else {
                out.push_str(&format!("`{code}`"));
            }
        }
        InlineContent::Link { url, content } => {
            out.push('[');
            content.iter().for_each(|child| push_inline(child, out));
            out.push_str("](");
            out.push_str(url);
            out.push(')');
        }
    }
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Three backticks, or one more than the longest run inside the content.
fn code_fence(content: &str) -> String {
    "`".repeat((longest_backtick_run(content) + 1).max(3))
}
