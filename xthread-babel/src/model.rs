//! Source-side data model: posts, articles and their rich-text blocks.
//!
//! These types are produced by a [`PostSource`](crate::source::PostSource) and consumed by
//! the renderers. They are never mutated after construction.
//!
//! All `offset`/`length` values count Unicode scalar values (Rust `char`s) of the text they
//! annotate. Source adapters are responsible for converting from their native units
//! (Draft.js uses UTF-16 code units).

/// Who wrote a post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Author {
    /// Screen name without the leading `@`
    pub handle: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Author {
    /// Handles are compared case-insensitively, the way the platform resolves them.
    pub fn same_as(&self, other: &Author) -> bool {
        self.handle.eq_ignore_ascii_case(&other.handle)
    }
}

/// Engagement counters shown in document headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub likes: u64,
    pub reposts: u64,
    pub replies: u64,
    pub views: Option<u64>,
}

/// A still image attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url: String,
    pub alt: Option<String>,
}

/// A single post as fetched from the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Post {
    pub id: String,
    /// Canonical link to the post, when the source reports one
    pub url: Option<String>,
    pub author: Author,
    /// Creation time exactly as the source reported it
    pub created_at: String,
    pub text: String,
    /// Links and mentions over `text`
    pub entities: Vec<EntityRange>,
    pub stats: Stats,
    pub photos: Vec<Photo>,
    pub has_video: bool,
    /// Quoted post, one level deep (a quoted post never carries its own quote)
    pub quote: Option<Box<Post>>,
    /// Id of the post this one replies to
    pub reply_to: Option<String>,
    /// Long-form payload, present for articles
    pub article: Option<Article>,
}

impl Post {
    /// Whether this post should be rendered with the article layout.
    pub fn is_article(&self) -> bool {
        self.article
            .as_ref()
            .is_some_and(|article| !article.blocks.is_empty())
    }

    /// Link used in document footers when the source did not report one.
    pub fn canonical_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| {
            format!("https://x.com/{}/status/{}", self.author.handle, self.id)
        })
    }
}

/// Long-form content attached to a post.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Article {
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub cover_url: Option<String>,
    pub blocks: Vec<RichBlock>,
}

/// Structural kind of a [`RichBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading level, 1 to 6
    Heading(u8),
    OrderedListItem,
    UnorderedListItem,
    Blockquote,
    CodeBlock,
    Image,
    /// Pre-rendered Markdown carried in the block text
    Markdown,
    /// Any kind this crate does not know; rendered as plain text
    Unknown(String),
}

impl BlockKind {
    pub fn is_list_item(&self) -> bool {
        matches!(self, BlockKind::OrderedListItem | BlockKind::UnorderedListItem)
    }
}

/// Image carried by an image block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub caption: Option<String>,
}

/// One block of a long-form document.
#[derive(Debug, Clone, PartialEq)]
pub struct RichBlock {
    pub kind: BlockKind,
    /// List nesting level; 0 for non-list kinds
    pub depth: usize,
    pub text: String,
    pub styles: Vec<StyleRange>,
    pub entities: Vec<EntityRange>,
    pub image: Option<ImageRef>,
}

impl RichBlock {
    /// Block of the given kind with plain text and no annotations.
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            depth: 0,
            text: text.into(),
            styles: Vec::new(),
            entities: Vec::new(),
            image: None,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_style(mut self, offset: usize, length: usize, kind: StyleKind) -> Self {
        self.styles.push(StyleRange {
            offset,
            length,
            kind,
        });
        self
    }

    pub fn with_entity(mut self, offset: usize, length: usize, kind: EntityKind) -> Self {
        self.entities.push(EntityRange {
            offset,
            length,
            kind,
        });
        self
    }

    pub fn image(url: impl Into<String>, caption: Option<String>) -> Self {
        let mut block = Self::new(BlockKind::Image, "");
        block.image = Some(ImageRef {
            url: url.into(),
            caption,
        });
        block
    }
}

/// Inline emphasis kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Bold,
    Italic,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub kind: StyleKind,
}

/// Target of an entity range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Link(String),
    /// Screen name without the leading `@`
    Mention(String),
}

impl EntityKind {
    /// URL the entity text should link to.
    pub fn href(&self) -> String {
        match self {
            EntityKind::Link(url) => url.clone(),
            EntityKind::Mention(handle) => {
                format!("https://x.com/{}", handle.trim_start_matches('@'))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub kind: EntityKind,
}
