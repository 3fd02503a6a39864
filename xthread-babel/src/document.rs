//! Document model builder: picks the layout for a fetched post and renders it.
//!
//! Three layouts exist:
//!
//! - **Article:** title, author block, cover image, assembled article body.
//! - **Post:** header with stats, text, numbered photos, video notice, quoted post.
//! - **Thread:** one shared header, then every post body in chain order separated by
//!   rules.
//!
//! All of them end with a source footer. The result is an IR [`Document`] plus the
//! media references it points at; [`DocumentModel::render`] turns it into Markdown.

use serde::Serialize;
use tracing::{debug, info};

use crate::common::flat_to_nested::assemble;
use crate::common::inline::render_inline;
use crate::common::media::{MediaReference, MediaResolver};
use crate::common::meta::{format_number, format_timestamp};
use crate::error::Result;
use crate::formats::markdown::serializer::serialize_to_markdown;
use crate::ir::nodes::{BlockQuote, DocNode, Document, Heading, Image, InlineContent, Paragraph};
use crate::model::{Post, RichBlock, Stats};
use crate::source::PostSource;
use crate::thread::{reconstruct_thread, ThreadOptions};

pub const DEFAULT_IMAGES_DIR_SUFFIX: &str = "_images";

const POST_TITLE_SUFFIX: &str = "的推文";
const ARTICLE_FALLBACK_SUFFIX: &str = "的文章";
const COVER_ALT: &str = "封面";
const PHOTO_ALT_PREFIX: &str = "图片";
const VIDEO_NOTICE: &str = "🎬 该推文包含视频，请访问原文查看";
const QUOTE_HEADING: &str = "引用推文";
const SOURCE_LABEL: &str = "来源";

/// Caller-side settings for [`build_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// The link the user asked for; used in the footer when the post has no URL
    pub source_url: Option<String>,
    /// Appended to the base name to form the images directory
    pub images_dir_suffix: String,
    pub thread: ThreadOptions,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            source_url: None,
            images_dir_suffix: DEFAULT_IMAGES_DIR_SUFFIX.to_string(),
            thread: ThreadOptions::default(),
        }
    }
}

/// Which layout produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Post,
    /// Number of posts in the thread
    Thread(usize),
    Article,
}

/// A rendered document before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentModel {
    pub document: Document,
    pub media: Vec<MediaReference>,
    /// `<handle>_<id>`
    pub base_name: String,
    /// `<base_name><suffix>`
    pub images_dir: String,
    pub kind: DocumentKind,
}

/// Final Markdown output and the images it references.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub markdown: String,
    pub media: Vec<MediaReference>,
    pub base_name: String,
    pub images_dir: String,
}

impl DocumentModel {
    pub fn render(&self) -> Result<RenderedDocument> {
        Ok(RenderedDocument {
            markdown: serialize_to_markdown(&self.document)?,
            media: self.media.clone(),
            base_name: self.base_name.clone(),
            images_dir: self.images_dir.clone(),
        })
    }
}

/// Builds the document for `start`, walking its thread when enabled.
///
/// Articles are never merged into threads. A post that announces an article without
/// carrying its blocks gets them from [`PostSource::fetch_article_blocks`].
pub fn build_document(
    mut start: Post,
    source: &dyn PostSource,
    options: &DocumentOptions,
) -> Result<DocumentModel> {
    if let Some(article) = start.article.as_mut() {
        if article.blocks.is_empty() {
            debug!(id = %start.id, "fetching article blocks");
            article.blocks = source.fetch_article_blocks(&start.id)?;
        }
    }

    if start.is_article() {
        info!(id = %start.id, "rendering article");
        return Ok(article_document(&start, options));
    }

    let thread = reconstruct_thread(start, source, &options.thread);
    if thread.is_thread() {
        Ok(thread_document(&thread.posts, thread.start, options))
    } else {
        let post = thread.posts.into_iter().next().unwrap_or_default();
        Ok(post_document(&post, options))
    }
}

fn base_name(post: &Post) -> String {
    format!("{}_{}", post.author.handle, post.id)
}

fn resolver_for(post: &Post, options: &DocumentOptions) -> (String, MediaResolver) {
    let base = base_name(post);
    let images_dir = format!("{base}{}", options.images_dir_suffix);
    (base, MediaResolver::new(images_dir))
}

fn finish(
    children: Vec<DocNode>,
    base_name: String,
    media: MediaResolver,
    kind: DocumentKind,
) -> DocumentModel {
    let images_dir = media.images_dir().to_string();
    DocumentModel {
        document: Document { children },
        media: media.into_references(),
        base_name,
        images_dir,
        kind,
    }
}

/// Single post layout.
pub fn post_document(post: &Post, options: &DocumentOptions) -> DocumentModel {
    let (base, mut media) = resolver_for(post, options);

    let mut children = vec![
        heading(
            1,
            format!(
                "@{} ({}) {POST_TITLE_SUFFIX}",
                post.author.handle, post.author.display_name
            ),
        ),
        quote_text(stats_line(&post.created_at, &post.stats)),
        DocNode::ThematicBreak,
    ];
    children.extend(post_body(post, &mut media));
    children.extend(footer(post, options));

    finish(children, base, media, DocumentKind::Post)
}

/// Thread layout; the header and footer come from the first post. Files are named after
/// `posts[requested]`, the post the thread was built around.
pub fn thread_document(
    posts: &[Post],
    requested: usize,
    options: &DocumentOptions,
) -> DocumentModel {
    let Some(first) = posts.first() else {
        return finish(
            Vec::new(),
            String::new(),
            MediaResolver::new(""),
            DocumentKind::Thread(0),
        );
    };
    let named_after = posts.get(requested).unwrap_or(first);
    let (base, mut media) = resolver_for(named_after, options);

    let mut children = vec![
        heading(
            1,
            format!(
                "@{} 的推文串 (Thread, 共 {} 条)",
                first.author.handle,
                posts.len()
            ),
        ),
        quote_text(stats_line(&first.created_at, &first.stats)),
    ];
    for post in posts {
        children.push(DocNode::ThematicBreak);
        children.extend(post_body(post, &mut media));
    }
    children.extend(footer(first, options));

    finish(children, base, media, DocumentKind::Thread(posts.len()))
}

/// Article layout. Falls back to the post layout when the post carries no article.
pub fn article_document(post: &Post, options: &DocumentOptions) -> DocumentModel {
    let Some(article) = post.article.as_ref() else {
        return post_document(post, options);
    };
    let (base, mut media) = resolver_for(post, options);

    let title = article
        .title
        .clone()
        .unwrap_or_else(|| format!("@{} {ARTICLE_FALLBACK_SUFFIX}", post.author.handle));
    let created_at = article.created_at.as_deref().unwrap_or(&post.created_at);

    let mut children = vec![
        heading(1, title),
        quote_text(format!(
            "✍️ @{} ({})\n{}",
            post.author.handle,
            post.author.display_name,
            stats_line(created_at, &post.stats)
        )),
    ];
    if let Some(cover) = &article.cover_url {
        children.push(DocNode::Image(Image {
            src: media.resolve_cover(cover),
            alt: COVER_ALT.to_string(),
        }));
    }
    children.push(DocNode::ThematicBreak);
    children.extend(article_body(&article.blocks, &mut media));
    children.extend(footer(post, options));

    finish(children, base, media, DocumentKind::Article)
}

fn article_body(blocks: &[RichBlock], media: &mut MediaResolver) -> Vec<DocNode> {
    assemble(blocks, media)
}

fn post_body(post: &Post, media: &mut MediaResolver) -> Vec<DocNode> {
    let mut nodes = Vec::new();

    if !post.text.trim().is_empty() {
        nodes.push(DocNode::Paragraph(Paragraph {
            content: render_inline(&post.text, &[], &post.entities),
        }));
    }

    for photo in &post.photos {
        let src = media.resolve_attachment(&photo.url);
        let alt = photo
            .alt
            .clone()
            .unwrap_or_else(|| format!("{PHOTO_ALT_PREFIX}{}", media.attachment_count()));
        nodes.push(DocNode::Image(Image { src, alt }));
    }

    if post.has_video {
        nodes.push(quote_text(VIDEO_NOTICE.to_string()));
    }

    if let Some(quoted) = &post.quote {
        let mut content = vec![
            InlineContent::Bold(vec![InlineContent::Text(format!(
                "@{}",
                quoted.author.handle
            ))]),
            InlineContent::Text(": ".to_string()),
        ];
        content.extend(render_inline(&quoted.text, &[], &quoted.entities));
        nodes.push(DocNode::ThematicBreak);
        nodes.push(heading(3, QUOTE_HEADING.to_string()));
        nodes.push(DocNode::BlockQuote(BlockQuote {
            children: vec![DocNode::Paragraph(Paragraph { content })],
        }));
    }

    nodes
}

fn footer(post: &Post, options: &DocumentOptions) -> [DocNode; 2] {
    let url = post
        .url
        .clone()
        .or_else(|| options.source_url.clone())
        .unwrap_or_else(|| post.canonical_url());
    [
        DocNode::ThematicBreak,
        DocNode::Paragraph(Paragraph {
            content: vec![InlineContent::Italic(vec![
                InlineContent::Text(format!("{SOURCE_LABEL}: ")),
                InlineContent::Link {
                    url: url.clone(),
                    content: vec![InlineContent::Text(url)],
                },
            ])],
        }),
    ]
}

/// `📅 <date> | ❤️ <likes> | 🔁 <reposts> | 💬 <replies> | 👁️ <views>`
pub fn stats_line(created_at: &str, stats: &Stats) -> String {
    format!(
        "📅 {} | ❤️ {} | 🔁 {} | 💬 {} | 👁️ {}",
        format_timestamp(created_at),
        format_number(stats.likes),
        format_number(stats.reposts),
        format_number(stats.replies),
        format_number(stats.views.unwrap_or(0)),
    )
}

fn heading(level: usize, text: String) -> DocNode {
    DocNode::Heading(Heading {
        level,
        content: vec![InlineContent::Text(text)],
    })
}

fn quote_text(text: String) -> DocNode {
    DocNode::BlockQuote(BlockQuote {
        children: vec![Paragraph::text(text).into()],
    })
}
