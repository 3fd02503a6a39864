//! Local filenames for the images a document references.
//!
//! The resolver never touches the network or the disk. It hands out a Markdown path for
//! every image appearance and records a [`MediaReference`] the writer realizes later.
//! There is no dedup: the same URL referenced twice yields two files.

use serde::Serialize;
use url::Url;

/// Extensions taken verbatim from a URL path.
const KNOWN_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

const DEFAULT_EXTENSION: &str = "jpg";

/// Why an image is part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaRole {
    Cover,
    /// Numbered photo attached to a post
    Attachment(usize),
    /// Numbered image inside an article body
    ArticleInline(usize),
}

/// A pending download and the filename it must be written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaReference {
    pub url: String,
    pub role: MediaRole,
    pub filename: String,
}

/// Assigns filenames per role in document order.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    images_dir: String,
    covers: usize,
    attachments: usize,
    article_images: usize,
    references: Vec<MediaReference>,
}

impl MediaResolver {
    /// `images_dir` is the directory name used in Markdown paths.
    pub fn new(images_dir: impl Into<String>) -> Self {
        Self {
            images_dir: images_dir.into(),
            covers: 0,
            attachments: 0,
            article_images: 0,
            references: Vec::new(),
        }
    }

    pub fn images_dir(&self) -> &str {
        &self.images_dir
    }

    /// `cover.<ext>`; a second cover in the same document becomes `cover_2.<ext>`.
    pub fn resolve_cover(&mut self, url: &str) -> String {
        self.covers += 1;
        let stem = match self.covers {
            1 => "cover".to_string(),
            n => format!("cover_{n}"),
        };
        self.assign(url, MediaRole::Cover, stem)
    }

    /// `<n>.<ext>`, numbered across every post of the document.
    pub fn resolve_attachment(&mut self, url: &str) -> String {
        self.attachments += 1;
        let n = self.attachments;
        self.assign(url, MediaRole::Attachment(n), n.to_string())
    }

    /// `article_<n>.<ext>`.
    pub fn resolve_article_image(&mut self, url: &str) -> String {
        self.article_images += 1;
        let n = self.article_images;
        self.assign(url, MediaRole::ArticleInline(n), format!("article_{n}"))
    }

    /// Number of attachments resolved so far.
    pub fn attachment_count(&self) -> usize {
        self.attachments
    }

    pub fn references(&self) -> &[MediaReference] {
        &self.references
    }

    pub fn into_references(self) -> Vec<MediaReference> {
        self.references
    }

    fn assign(&mut self, url: &str, role: MediaRole, stem: String) -> String {
        let filename = format!("{stem}.{}", image_extension(url));
        let path = format!("{}/{}", self.images_dir, filename);
        self.references.push(MediaReference {
            url: url.to_string(),
            role,
            filename,
        });
        path
    }
}

/// File extension for an image URL, without the dot.
///
/// Taken from the URL path when it is a known image extension, else from a `format=`
/// query parameter (`?format=png&name=large`), else `jpg`.
pub fn image_extension(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return DEFAULT_EXTENSION.to_string();
    };

    let from_path = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|last| last.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()));
    if let Some(ext) = from_path {
        return ext;
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "format")
        .map(|(_, value)| value.to_ascii_lowercase())
        .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
