//! Schema of the FxTwitter status API and its conversion into the post model.
//!
//! The API is loosely typed: ids arrive as strings or numbers, `media` is either an
//! object (`photos`, `videos`, `all`) or a plain list, and an article's `entityMap` is
//! either a list of `{key, value}` pairs or an object keyed by entity key. Everything
//! optional defaults so a partial payload still renders.
//!
//! Draft.js block offsets count UTF-16 code units. They are converted to `char` offsets
//! here, so the rest of the crate only deals with one unit.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    Article, Author, BlockKind, EntityKind, EntityRange, ImageRef, Photo, Post, RichBlock,
    Stats, StyleKind, StyleRange,
};

/// Envelope of `GET /<user>/status/<id>`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tweet: Option<ApiTweet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Id {
    Text(String),
    Number(u64),
}

impl Id {
    fn into_string(self) -> String {
        match self {
            Id::Text(text) => text,
            Id::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTweet {
    #[serde(default)]
    id: Option<Id>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    raw_text: Option<ApiRawText>,
    #[serde(default)]
    author: ApiAuthor,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    retweets: u64,
    #[serde(default)]
    replies: u64,
    #[serde(default)]
    views: Option<u64>,
    #[serde(default)]
    media: Option<ApiMedia>,
    #[serde(default)]
    medias: Option<Vec<ApiMediaItem>>,
    #[serde(default)]
    quote: Option<Box<ApiTweet>>,
    #[serde(default)]
    replying_to_status: Option<Id>,
    #[serde(default)]
    article: Option<ApiArticle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    screen_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ApiMedia {
    Grouped {
        #[serde(default)]
        photos: Vec<ApiMediaItem>,
        #[serde(default)]
        videos: Vec<ApiMediaItem>,
        #[serde(default)]
        all: Vec<ApiMediaItem>,
    },
    Flat(Vec<ApiMediaItem>),
}

#[derive(Debug, Clone, Deserialize)]
struct ApiMediaItem {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(default, rename = "altText")]
    alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiRawText {
    #[serde(default)]
    text: String,
    #[serde(default)]
    facets: Vec<ApiFacet>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiFacet {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    indices: Vec<usize>,
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    replacement: Option<String>,
    #[serde(default)]
    display: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    cover_media: Option<ApiArticleMedia>,
    #[serde(default)]
    content: Option<ApiArticleContent>,
    #[serde(default)]
    media_entities: Vec<ApiArticleMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiArticleMedia {
    #[serde(default)]
    media_id: Option<Id>,
    #[serde(default)]
    media_info: Option<ApiMediaInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiMediaInfo {
    #[serde(default)]
    original_img_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiArticleContent {
    #[serde(default)]
    blocks: Vec<DraftBlock>,
    #[serde(default, rename = "entityMap")]
    entity_map: Option<DraftEntityMap>,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftBlock {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    depth: usize,
    #[serde(default, rename = "inlineStyleRanges")]
    inline_style_ranges: Vec<DraftStyleRange>,
    #[serde(default, rename = "entityRanges")]
    entity_ranges: Vec<DraftEntityRange>,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftStyleRange {
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    #[serde(default)]
    style: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftEntityRange {
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    key: Id,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DraftEntityMap {
    List(Vec<DraftEntityEntry>),
    Keyed(HashMap<String, DraftEntity>),
}

#[derive(Debug, Clone, Deserialize)]
struct DraftEntityEntry {
    key: Id,
    value: DraftEntity,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftEntity {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl DraftEntityMap {
    fn into_map(self) -> HashMap<String, DraftEntity> {
        match self {
            DraftEntityMap::List(entries) => entries
                .into_iter()
                .map(|entry| (entry.key.into_string(), entry.value))
                .collect(),
            DraftEntityMap::Keyed(map) => map,
        }
    }
}

/// Parses a raw API response body into a post.
pub fn parse_response(body: &str) -> Result<Post> {
    let response: ApiResponse = serde_json::from_str(body)?;
    response.into_post()
}

/// Parses a saved dump: one response object, or an array of them (a thread).
pub fn parse_saved(body: &str) -> Result<Vec<Post>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value::<ApiResponse>(item)?.into_post())
            .collect(),
        single => serde_json::from_value::<ApiResponse>(single)?
            .into_post()
            .map(|post| vec![post]),
    }
}

impl ApiResponse {
    pub fn into_post(self) -> Result<Post> {
        let message = self.message.unwrap_or_else(|| "unknown error".to_string());
        match (self.code, self.tweet) {
            (200, Some(tweet)) => Ok(tweet.into_post()),
            (200, None) => Err(Error::Api("response carries no tweet".to_string())),
            (404, _) => Err(Error::NotFound(message)),
            (_, _) => Err(Error::Api(message)),
        }
    }
}

impl ApiTweet {
    pub fn into_post(self) -> Post {
        let (text, entities) = match self.raw_text {
            Some(raw) if !raw.text.is_empty() => expand_facets(&raw.text, &raw.facets),
            _ => (self.text, Vec::new()),
        };

        let (photos, has_video) = collect_media(self.media, self.medias);
        let media_urls = self
            .article
            .as_ref()
            .map(|article| media_url_map(&article.media_entities))
            .unwrap_or_default();

        Post {
            id: self.id.map(Id::into_string).unwrap_or_default(),
            url: self.url.filter(|url| !url.is_empty()),
            author: Author {
                handle: self
                    .author
                    .screen_name
                    .unwrap_or_else(|| "unknown".to_string()),
                display_name: self.author.name.unwrap_or_else(|| "Unknown".to_string()),
                avatar_url: self.author.avatar_url,
            },
            created_at: self.created_at,
            text,
            entities,
            stats: Stats {
                likes: self.likes,
                reposts: self.retweets,
                replies: self.replies,
                views: self.views,
            },
            photos,
            has_video,
            quote: self.quote.map(|quote| {
                let mut quote = quote.into_post();
                quote.quote = None;
                Box::new(quote)
            }),
            reply_to: self.replying_to_status.map(Id::into_string),
            article: self.article.map(|article| convert_article(article, &media_urls)),
        }
    }
}

fn collect_media(
    media: Option<ApiMedia>,
    medias: Option<Vec<ApiMediaItem>>,
) -> (Vec<Photo>, bool) {
    let is_video = |item: &ApiMediaItem| matches!(item.kind.as_str(), "video" | "gif");
    let photo = |item: ApiMediaItem| Photo {
        url: item.url,
        alt: item.alt_text.filter(|alt| !alt.is_empty()),
    };

    let (photos, has_video) = match media {
        Some(ApiMedia::Grouped {
            photos,
            videos,
            all,
        }) => {
            let has_video = !videos.is_empty() || all.iter().any(is_video);
            let photos = if photos.is_empty() {
                all.into_iter().filter(|m| m.kind == "photo").collect()
            } else {
                photos
            };
            (photos, has_video)
        }
        Some(ApiMedia::Flat(items)) => flat_media(items),
        None => flat_media(medias.unwrap_or_default()),
    };

    let photos = photos
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .map(photo)
        .collect();
    (photos, has_video)
}

fn flat_media(items: Vec<ApiMediaItem>) -> (Vec<ApiMediaItem>, bool) {
    let has_video = items
        .iter()
        .any(|item| matches!(item.kind.as_str(), "video" | "gif"));
    let photos = items.into_iter().filter(|m| m.kind == "photo").collect();
    (photos, has_video)
}

/// Rebuilds post text from `raw_text`, replacing shortened links with their targets.
///
/// Facet indices are `char` offsets into the raw text. URL facets become link entities
/// over the expanded URL; mention facets become mention entities.
fn expand_facets(raw: &str, facets: &[ApiFacet]) -> (String, Vec<EntityRange>) {
    let chars: Vec<char> = raw.chars().collect();
    let mut facets: Vec<&ApiFacet> = facets
        .iter()
        .filter(|facet| facet.indices.len() == 2 && facet.indices[0] < facet.indices[1])
        .collect();
    facets.sort_by_key(|facet| facet.indices[0]);

    let mut text = String::new();
    let mut text_len = 0;
    let mut entities = Vec::new();
    let mut cursor = 0;

    for facet in facets {
        let start = facet.indices[0].min(chars.len());
        let end = facet.indices[1].min(chars.len());
        if start < cursor || start >= end {
            continue;
        }
        let before: String = chars[cursor..start].iter().collect();
        text_len += before.chars().count();
        text.push_str(&before);
        let original: String = chars[start..end].iter().collect();

        let (visible, kind) = match facet.kind.as_str() {
            "url" => {
                let target = facet
                    .replacement
                    .clone()
                    .or_else(|| facet.original.clone())
                    .unwrap_or_else(|| original.clone());
                (target.clone(), Some(EntityKind::Link(target)))
            }
            "mention" => {
                let handle = facet.display.clone().unwrap_or_else(|| original.clone());
                (
                    original.clone(),
                    Some(EntityKind::Mention(
                        handle.trim_start_matches('@').to_string(),
                    )),
                )
            }
            other => {
                debug!(kind = other, "ignoring text facet");
                (original.clone(), None)
            }
        };

        let length = visible.chars().count();
        if let Some(kind) = kind {
            entities.push(EntityRange {
                offset: text_len,
                length,
                kind,
            });
        }
        text.push_str(&visible);
        text_len += length;
        cursor = end;
    }
    text.extend(&chars[cursor..]);

    (text, entities)
}

fn media_url_map(media: &[ApiArticleMedia]) -> HashMap<String, String> {
    media
        .iter()
        .filter_map(|entity| {
            let id = entity.media_id.clone()?.into_string();
            let url = entity.media_info.as_ref()?.original_img_url.clone()?;
            (!id.is_empty() && !url.is_empty()).then_some((id, url))
        })
        .collect()
}

fn convert_article(article: ApiArticle, media_urls: &HashMap<String, String>) -> Article {
    let (blocks, entity_map) = match article.content {
        Some(content) => (
            content.blocks,
            content
                .entity_map
                .map(DraftEntityMap::into_map)
                .unwrap_or_default(),
        ),
        None => (Vec::new(), HashMap::new()),
    };

    Article {
        title: article.title.filter(|title| !title.trim().is_empty()),
        created_at: article.created_at,
        cover_url: article
            .cover_media
            .and_then(|cover| cover.media_info)
            .and_then(|info| info.original_img_url)
            .filter(|url| !url.is_empty()),
        blocks: blocks
            .into_iter()
            .map(|block| convert_block(block, &entity_map, media_urls))
            .collect(),
    }
}

/// Maps a Draft.js offset in UTF-16 code units to a `char` offset.
struct Utf16Index {
    /// UTF-16 offset at which each char starts
    starts: Vec<usize>,
}

impl Utf16Index {
    fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len());
        let mut offset = 0;
        for c in text.chars() {
            starts.push(offset);
            offset += c.len_utf16();
        }
        Self { starts }
    }

    fn to_char(&self, utf16: usize) -> usize {
        self.starts.partition_point(|&start| start < utf16)
    }

    fn span(&self, offset: usize, length: usize) -> (usize, usize) {
        let start = self.to_char(offset);
        let end = self.to_char(offset.saturating_add(length));
        (start, end.saturating_sub(start))
    }
}

fn block_kind(kind: &str) -> BlockKind {
    match kind {
        "unstyled" | "paragraph" => BlockKind::Paragraph,
        "header-one" => BlockKind::Heading(1),
        "header-two" => BlockKind::Heading(2),
        "header-three" => BlockKind::Heading(3),
        "header-four" => BlockKind::Heading(4),
        "header-five" => BlockKind::Heading(5),
        "header-six" => BlockKind::Heading(6),
        "ordered-list-item" => BlockKind::OrderedListItem,
        "unordered-list-item" => BlockKind::UnorderedListItem,
        "blockquote" => BlockKind::Blockquote,
        "code-block" => BlockKind::CodeBlock,
        other => BlockKind::Unknown(other.to_string()),
    }
}

fn style_kind(style: &str) -> Option<StyleKind> {
    match style.to_ascii_lowercase().as_str() {
        "bold" => Some(StyleKind::Bold),
        "italic" => Some(StyleKind::Italic),
        "code" => Some(StyleKind::Code),
        _ => None,
    }
}

fn data_str<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

fn convert_block(
    block: DraftBlock,
    entities: &HashMap<String, DraftEntity>,
    media_urls: &HashMap<String, String>,
) -> RichBlock {
    let kind = block.kind.as_deref().unwrap_or("unstyled");
    if kind == "atomic" {
        return convert_atomic(&block, entities, media_urls);
    }

    let index = Utf16Index::new(&block.text);
    let mut rich = RichBlock::new(block_kind(kind), block.text.clone());
    if rich.kind.is_list_item() {
        rich.depth = block.depth;
    }

    for range in &block.inline_style_ranges {
        match style_kind(&range.style) {
            Some(style) => {
                let (offset, length) = index.span(range.offset, range.length);
                rich.styles.push(StyleRange {
                    offset,
                    length,
                    kind: style,
                });
            }
            None => debug!(style = %range.style, "ignoring inline style"),
        }
    }

    for range in &block.entity_ranges {
        let key = range.key.clone().into_string();
        let Some(entity) = entities.get(&key) else {
            debug!(key = %key, "entity range without entity");
            continue;
        };
        let (offset, length) = index.span(range.offset, range.length);
        let kind = match entity.kind.as_str() {
            "LINK" => data_str(&entity.data, &["url", "href"]).map(|url| EntityKind::Link(url.to_string())),
            "MENTION" => data_str(&entity.data, &["screen_name", "screenName", "handle"])
                .map(str::to_string)
                .or_else(|| {
                    let visible: String = block.text.chars().skip(offset).take(length).collect();
                    (!visible.is_empty()).then_some(visible)
                })
                .map(|handle| EntityKind::Mention(handle.trim_start_matches('@').to_string())),
            other => {
                debug!(kind = other, "ignoring entity");
                None
            }
        };
        if let Some(kind) = kind {
            rich.entities.push(EntityRange {
                offset,
                length,
                kind,
            });
        }
    }

    rich
}

/// Atomic blocks carry their payload in the first entity.
fn convert_atomic(
    block: &DraftBlock,
    entities: &HashMap<String, DraftEntity>,
    media_urls: &HashMap<String, String>,
) -> RichBlock {
    let entity = block
        .entity_ranges
        .first()
        .and_then(|range| entities.get(&range.key.clone().into_string()));
    let Some(entity) = entity else {
        return RichBlock::new(BlockKind::Unknown("atomic".to_string()), block.text.trim());
    };
    let data = &entity.data;

    match entity.kind.as_str() {
        "MARKDOWN" => RichBlock::new(
            BlockKind::Markdown,
            data_str(data, &["markdown"]).unwrap_or_default(),
        ),
        "IMAGE" => image_block(
            data_str(data, &["src", "url"]),
            data_str(data, &["caption", "alt"]),
        ),
        "MEDIA" => {
            let by_id = data
                .get("mediaItems")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(|item| item.get("mediaId"))
                .and_then(|id| match id {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .and_then(|id| media_urls.get(&id).cloned());
            let direct = data
                .get("media_info")
                .and_then(|info| data_str(info, &["original_img_url"]))
                .map(str::to_string);
            image_block(
                by_id.or(direct).as_deref(),
                data_str(data, &["caption"]),
            )
        }
        other => {
            debug!(kind = other, "unsupported atomic entity");
            RichBlock::new(BlockKind::Unknown(other.to_lowercase()), block.text.trim())
        }
    }
}

fn image_block(url: Option<&str>, caption: Option<&str>) -> RichBlock {
    let mut block = RichBlock::new(BlockKind::Image, "");
    block.image = url.map(|url| ImageRef {
        url: url.to_string(),
        caption: caption
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    });
    block
}
