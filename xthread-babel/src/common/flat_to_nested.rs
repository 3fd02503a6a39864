//! Assembles a flat block sequence into a nested IR tree.
//!
//! # The High-Level Concept
//!
//! Rich-text blocks arrive as a flat sequence where list nesting is only implied by each
//! list item's `depth`. The assembler rebuilds the tree with a stack of "open" lists. The
//! stack is owned by one [`Assembler`] value, so every render is independent.
//!
//! # The Algorithm
//!
//! 1. **List item at depth `d`:**
//!    - Close every open list deeper than `d`
//!    - If the top list sits at depth `d` with the same kind, append the item to it
//!    - If it sits at depth `d` with the other kind, close it and open a new list
//!    - Otherwise open a new list; when a shallower list is open, the new list becomes
//!      a child of that list's last item
//!
//! 2. **Any other block:** close all open lists, then append the block at top level.
//!    Consecutive code blocks are merged into one.
//!
//! 3. **Closing a list:** pop it and attach it to the last item of the list below it, or
//!    to the top-level sequence when the stack is empty.
//!
//! Blocks that render to nothing (an empty paragraph, an image without a URL) still close
//! all open lists. A list opened after a close always starts numbering at 1.

use super::blocks::{render_block, RenderedBlock};
use super::media::MediaResolver;
use crate::ir::nodes::{CodeBlock, DocNode, List, ListItem};
use crate::model::RichBlock;

#[derive(Debug)]
struct OpenList {
    ordered: bool,
    depth: usize,
    items: Vec<ListItem>,
}

/// Stateful builder for one document body.
pub struct Assembler<'m> {
    media: &'m mut MediaResolver,
    nodes: Vec<DocNode>,
    stack: Vec<OpenList>,
}

impl<'m> Assembler<'m> {
    pub fn new(media: &'m mut MediaResolver) -> Self {
        Self {
            media,
            nodes: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Renders one block and places it in the tree.
    pub fn push(&mut self, block: &RichBlock) {
        match render_block(block, self.media) {
            RenderedBlock::Break => self.close_all(),
            RenderedBlock::ListItem {
                ordered,
                depth,
                item,
            } => self.push_item(ordered, depth, item),
            RenderedBlock::Node(node) => {
                self.close_all();
                self.push_node(node);
            }
        }
    }

    /// Closes any open list and returns the top-level nodes.
    pub fn finish(mut self) -> Vec<DocNode> {
        self.close_all();
        self.nodes
    }

    fn push_item(&mut self, ordered: bool, depth: usize, item: ListItem) {
        while self.stack.last().is_some_and(|open| open.depth > depth) {
            self.close_top();
        }

        match self.stack.last_mut() {
            Some(open) if open.depth == depth && open.ordered == ordered => {
                open.items.push(item);
                return;
            }
            Some(open) if open.depth == depth => self.close_top(),
            _ => {}
        }

        self.stack.push(OpenList {
            ordered,
            depth,
            items: vec![item],
        });
    }

    fn push_node(&mut self, node: DocNode) {
        if let DocNode::CodeBlock(next) = &node {
            if let Some(DocNode::CodeBlock(previous)) = self.nodes.last_mut() {
                if previous.language.is_none() && next.language.is_none() {
                    merge_code(previous, next);
                    return;
                }
            }
        }
        self.nodes.push(node);
    }

    fn close_top(&mut self) {
        let Some(open) = self.stack.pop() else {
            return;
        };
        let list = DocNode::List(List {
            ordered: open.ordered,
            depth: open.depth,
            start: 1,
            items: open.items,
        });
        match self
            .stack
            .last_mut()
            .and_then(|parent| parent.items.last_mut())
        {
            Some(parent_item) => parent_item.children.push(list),
            None => self.nodes.push(list),
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close_top();
        }
    }
}

fn merge_code(previous: &mut CodeBlock, next: &CodeBlock) {
    if !previous.content.ends_with('\n') {
        previous.content.push('\n');
    }
    previous.content.push_str(&next.content);
}

/// Assembles a block sequence into top-level IR nodes.
pub fn assemble(blocks: &[RichBlock], media: &mut MediaResolver) -> Vec<DocNode> {
    let mut assembler = Assembler::new(media);
    for block in blocks {
        assembler.push(block);
    }
    assembler.finish()
}

/// Assembles and serializes an article body to Markdown.
pub fn render_body(blocks: &[RichBlock], media: &mut MediaResolver) -> String {
    crate::formats::markdown::serializer::render_nodes(&assemble(blocks, media))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn body(blocks: &[RichBlock]) -> String {
        render_body(blocks, &mut MediaResolver::new("img"))
    }

    fn ul(text: &str, depth: usize) -> RichBlock {
        RichBlock::new(BlockKind::UnorderedListItem, text).with_depth(depth)
    }

    fn ol(text: &str, depth: usize) -> RichBlock {
        RichBlock::new(BlockKind::OrderedListItem, text).with_depth(depth)
    }

    fn p(text: &str) -> RichBlock {
        RichBlock::new(BlockKind::Paragraph, text)
    }

    #[test]
    fn heading_paragraph_and_list() {
        let blocks = [
            RichBlock::new(BlockKind::Heading(1), "Title"),
            p("Intro"),
            ul("A", 0),
            ul("B", 0),
            p("Outro"),
        ];
        assert_eq!(body(&blocks), "# Title\n\nIntro\n\n- A\n- B\n\nOutro");
    }

    #[test]
    fn nested_lists_indent_by_depth() {
        let blocks = [ol("one", 0), ul("sub a", 1), ul("sub b", 1), ol("two", 0)];
        assert_eq!(body(&blocks), "1. one\n  - sub a\n  - sub b\n2. two");
    }

    #[test]
    fn numbering_restarts_after_shallower_block() {
        let blocks = [
            ul("parent", 0),
            ol("x", 1),
            ol("y", 1),
            ul("next", 0),
            ol("z", 1),
        ];
        assert_eq!(
            body(&blocks),
            "- parent\n  1. x\n  2. y\n- next\n  1. z"
        );
    }

    #[test]
    fn numbering_restarts_after_paragraph() {
        let blocks = [ol("a", 0), ol("b", 0), p("break"), ol("c", 0)];
        assert_eq!(body(&blocks), "1. a\n2. b\n\nbreak\n\n1. c");
    }

    #[test]
    fn kind_change_starts_a_new_list() {
        let blocks = [ol("a", 0), ul("b", 0), ol("c", 0)];
        let nodes = assemble(&blocks, &mut MediaResolver::new("img"));
        assert_eq!(nodes.len(), 3);
        assert_eq!(body(&blocks), "1. a\n\n- b\n\n1. c");
    }

    #[test]
    fn empty_paragraph_restarts_numbering() {
        let blocks = [ol("a", 0), p(""), ol("b", 0)];
        assert_eq!(body(&blocks), "1. a\n\n1. b");
    }

    #[test]
    fn image_without_url_closes_nested_lists() {
        let blocks = [
            ol("a", 0),
            ul("x", 1),
            RichBlock::image("", None),
            ol("b", 0),
        ];
        assert_eq!(body(&blocks), "1. a\n  - x\n\n1. b");
    }

    #[test]
    fn consecutive_code_blocks_share_a_fence() {
        let blocks = [
            RichBlock::new(BlockKind::CodeBlock, "let a = 1;"),
            RichBlock::new(BlockKind::CodeBlock, "let b = 2;"),
        ];
        assert_eq!(body(&blocks), "```\nlet a = 1;\nlet b = 2;\n```");
    }

    #[test]
    fn depth_jump_keeps_authored_indent() {
        let blocks = [ul("top", 0), ul("deep", 2)];
        assert_eq!(body(&blocks), "- top\n    - deep");
    }
}
