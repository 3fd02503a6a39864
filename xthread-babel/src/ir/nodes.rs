//! Core data structures for the Intermediate Representation (IR).

use serde::Serialize;

/// A semantic, block-level node of a rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocNode {
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    BlockQuote(BlockQuote),
    CodeBlock(CodeBlock),
    Image(Image),
    ThematicBreak,
    Markdown(RawMarkdown),
}

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub children: Vec<DocNode>,
}

/// Represents a heading with a specific level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: usize,
    pub content: Vec<InlineContent>,
}

/// Represents a paragraph of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub content: Vec<InlineContent>,
}

/// Represents a list of items.
///
/// `depth` is the nesting level the list was authored at; serializers indent from it
/// rather than from the tree position so malformed depth jumps keep their indentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub depth: usize,
    pub start: usize,
    pub items: Vec<ListItem>,
}

/// Represents an item in a list. Nested lists live in `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub content: Vec<InlineContent>,
    pub children: Vec<DocNode>,
}

/// A quoted region; every rendered line gets a `> ` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockQuote {
    pub children: Vec<DocNode>,
}

/// Represents a block of verbatim text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub content: String,
}

/// Represents an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Markdown that is emitted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMarkdown {
    pub content: String,
}

/// Represents inline content, such as text, bold, italics, etc.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineContent {
    Text(String),
    Bold(Vec<InlineContent>),
    Italic(Vec<InlineContent>),
    Code(String),
    Link {
        url: String,
        content: Vec<InlineContent>,
    },
}

impl InlineContent {
    /// Appends the visible text of this node, without markup.
    pub fn push_plain_text(&self, out: &mut String) {
        match self {
            InlineContent::Text(text) | InlineContent::Code(text) => out.push_str(text),
            InlineContent::Bold(children)
            | InlineContent::Italic(children)
            | InlineContent::Link {
                content: children, ..
            } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// Visible text of an inline sequence.
pub fn inline_plain_text(content: &[InlineContent]) -> String {
    let mut out = String::new();
    for inline in content {
        inline.push_plain_text(&mut out);
    }
    out
}

impl Paragraph {
    pub fn text(text: impl Into<String>) -> Self {
        Paragraph {
            content: vec![InlineContent::Text(text.into())],
        }
    }
}

impl From<Paragraph> for DocNode {
    fn from(paragraph: Paragraph) -> Self {
        DocNode::Paragraph(paragraph)
    }
}

impl From<Heading> for DocNode {
    fn from(heading: Heading) -> Self {
        DocNode::Heading(heading)
    }
}

impl From<Image> for DocNode {
    fn from(image: Image) -> Self {
        DocNode::Image(image)
    }
}

impl From<BlockQuote> for DocNode {
    fn from(quote: BlockQuote) -> Self {
        DocNode::BlockQuote(quote)
    }
}
