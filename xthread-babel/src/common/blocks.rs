//! Rendering of a single rich-text block.
//!
//! A block becomes a finished IR node, a list item, or a break when it has nothing to
//! show. List items are not wrapped
//! here: numbering and nesting depend on the sibling blocks, so they are left to the
//! assembler in [`flat_to_nested`](super::flat_to_nested).

use tracing::debug;

use super::inline::render_inline;
use super::media::MediaResolver;
use crate::formats::markdown::parser::snippet_to_node;
use crate::ir::nodes::{BlockQuote, CodeBlock, DocNode, Heading, Image, ListItem, Paragraph};
use crate::model::{BlockKind, RichBlock};

/// Output of [`render_block`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Node(DocNode),
    ListItem {
        ordered: bool,
        depth: usize,
        item: ListItem,
    },
    /// Nothing to emit (empty paragraph, image without a URL). Still ends any open list.
    Break,
}

/// Renders one block. Image blocks request their path from `media`.
pub fn render_block(block: &RichBlock, media: &mut MediaResolver) -> RenderedBlock {
    let inline = || render_inline(&block.text, &block.styles, &block.entities);

    match &block.kind {
        BlockKind::Paragraph => {
            if block.text.trim().is_empty() {
                return RenderedBlock::Break;
            }
            RenderedBlock::Node(Paragraph { content: inline() }.into())
        }
        BlockKind::Heading(level) => {
            if block.text.trim().is_empty() {
                return RenderedBlock::Break;
            }
            RenderedBlock::Node(
                Heading {
                    level: usize::from((*level).clamp(1, 6)),
                    content: inline(),
                }
                .into(),
            )
        }
        BlockKind::OrderedListItem | BlockKind::UnorderedListItem => RenderedBlock::ListItem {
            ordered: block.kind == BlockKind::OrderedListItem,
            depth: block.depth,
            item: ListItem {
                content: inline(),
                children: Vec::new(),
            },
        },
        BlockKind::Blockquote => RenderedBlock::Node(
            BlockQuote {
                children: vec![Paragraph { content: inline() }.into()],
            }
            .into(),
        ),
        BlockKind::CodeBlock => RenderedBlock::Node(DocNode::CodeBlock(CodeBlock {
            language: None,
            content: block.text.clone(),
        })),
        BlockKind::Image => match block.image.as_ref().filter(|image| !image.url.is_empty()) {
            Some(image) => {
                let src = media.resolve_article_image(&image.url);
                let alt = image
                    .caption
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                RenderedBlock::Node(Image { src, alt }.into())
            }
            None => {
                debug!("dropping image block without a URL");
                RenderedBlock::Break
            }
        },
        BlockKind::Markdown => {
            if block.text.trim().is_empty() {
                return RenderedBlock::Break;
            }
            RenderedBlock::Node(snippet_to_node(&block.text))
        }
        BlockKind::Unknown(name) => {
            debug!(kind = %name, "unknown block kind rendered as plain text");
            if block.text.trim().is_empty() {
                return RenderedBlock::Break;
            }
            RenderedBlock::Node(Paragraph::text(block.text.clone()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::InlineContent;
    use crate::model::StyleKind;

    fn render(block: RichBlock) -> RenderedBlock {
        render_block(&block, &mut MediaResolver::new("img"))
    }

    #[test]
    fn code_block_ignores_styles() {
        let block = RichBlock::new(BlockKind::CodeBlock, "fn main() {}")
            .with_style(0, 2, StyleKind::Bold)
            .with_style(3, 4, StyleKind::Italic);
        assert_eq!(
            render(block),
            RenderedBlock::Node(DocNode::CodeBlock(CodeBlock {
                language: None,
                content: "fn main() {}".to_string(),
            }))
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        let RenderedBlock::Node(DocNode::Heading(heading)) =
            render(RichBlock::new(BlockKind::Heading(9), "Deep"))
        else {
            panic!("expected a heading");
        };
        assert_eq!(heading.level, 6);
    }

    #[test]
    fn list_item_keeps_kind_and_depth() {
        let rendered = render(RichBlock::new(BlockKind::OrderedListItem, "x").with_depth(2));
        assert_eq!(
            rendered,
            RenderedBlock::ListItem {
                ordered: true,
                depth: 2,
                item: ListItem {
                    content: vec![InlineContent::Text("x".to_string())],
                    children: vec![],
                },
            }
        );
    }

    #[test]
    fn image_without_url_emits_a_break() {
        let mut block = RichBlock::image("", None);
        assert_eq!(render(block.clone()), RenderedBlock::Break);
        block.image = None;
        assert_eq!(render(block), RenderedBlock::Break);
    }

    #[test]
    fn image_uses_caption_as_alt() {
        let mut media = MediaResolver::new("img");
        let block = RichBlock::image("https://img.example/a.png", Some(" Chart ".to_string()));
        assert_eq!(
            render_block(&block, &mut media),
            RenderedBlock::Node(DocNode::Image(Image {
                src: "img/article_1.png".to_string(),
                alt: "Chart".to_string(),
            }))
        );
    }

    #[test]
    fn unknown_kind_degrades_to_paragraph() {
        let block = RichBlock::new(BlockKind::Unknown("tweet-embed".to_string()), "raw **text**");
        assert_eq!(
            render(block),
            RenderedBlock::Node(Paragraph::text("raw **text**").into())
        );
    }

    #[test]
    fn blank_paragraph_emits_a_break() {
        assert_eq!(
            render(RichBlock::new(BlockKind::Paragraph, "  ")),
            RenderedBlock::Break
        );
    }
}
