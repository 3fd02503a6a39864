//! Markdown snippet parsing
//!
//! Articles may embed raw Markdown as an atomic block. The snippet is parsed with comrak
//! only to tell a lone fenced code block apart from anything else.

use comrak::nodes::NodeValue;
use comrak::{parse_document, Arena, ComrakOptions};

use crate::ir::nodes::{CodeBlock, DocNode, RawMarkdown};

/// Converts an embedded Markdown snippet into one node.
///
/// A snippet made of a single code block becomes a [`CodeBlock`] so it is fenced like
/// any other code; everything else is kept verbatim.
pub fn snippet_to_node(source: &str) -> DocNode {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut blocks = root.children();
    if let (Some(only), None) = (blocks.next(), blocks.next()) {
        if let NodeValue::CodeBlock(code) = &only.data.borrow().value {
            return DocNode::CodeBlock(CodeBlock {
                language: non_empty(&code.info),
                content: code.literal.trim_end_matches('\n').to_string(),
            });
        }
    }

    DocNode::Markdown(RawMarkdown {
        content: source.trim().to_string(),
    })
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options
}

fn non_empty(info: &str) -> Option<String> {
    let info = info.trim();
    (!info.is_empty()).then(|| info.to_string())
}
