//! Writing a rendered document and its images to disk.
//!
//! Provides a single call that serializes a [`DocumentModel`] in the requested format,
//! writes `<output>/<base_name>.<ext>` and realizes every media reference under
//! `<output>/<images_dir>/`. Image failures are collected in the report and never abort
//! the publish: the document keeps referencing the path either way.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::common::media::MediaReference;
use crate::common::paths::normalize_path;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::registry::FormatRegistry;
use crate::source::MediaFetcher;

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new(&model, "output").with_format("markdown");
/// let report = publish(spec, Some(&client))?;
/// ```
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub model: &'a DocumentModel,
    pub output_dir: PathBuf,
    /// Format name from the [`FormatRegistry`]
    pub format: &'a str,
}

impl<'a> PublishSpec<'a> {
    pub fn new(model: &'a DocumentModel, output_dir: impl AsRef<Path>) -> Self {
        Self {
            model,
            output_dir: output_dir.as_ref().to_path_buf(),
            format: "markdown",
        }
    }

    pub fn with_format(mut self, format: &'a str) -> Self {
        self.format = format;
        self
    }
}

/// An image that could not be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFailure {
    pub reference: MediaReference,
    pub error: String,
}

/// What a publish wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub document_path: PathBuf,
    /// Present when the document references images
    pub images_dir: Option<PathBuf>,
    pub saved: Vec<PathBuf>,
    pub failed: Vec<MediaFailure>,
    /// References not downloaded because no fetcher was given
    pub skipped: usize,
}

/// Writes the document, then downloads its media with `fetcher` when one is given.
pub fn publish(spec: PublishSpec<'_>, fetcher: Option<&dyn MediaFetcher>) -> Result<PublishReport> {
    let registry = FormatRegistry::with_defaults();
    let format = registry.get(spec.format)?;
    let extension = format
        .file_extensions()
        .first()
        .copied()
        .unwrap_or(spec.format);
    let text = registry.serialize(&spec.model.document, spec.format)?;

    fs::create_dir_all(&spec.output_dir)?;
    let document_path = spec
        .output_dir
        .join(format!("{}.{extension}", spec.model.base_name));
    fs::write(&document_path, text)?;
    info!(path = %document_path.display(), "document written");

    let mut report = PublishReport {
        document_path,
        images_dir: None,
        saved: Vec::new(),
        failed: Vec::new(),
        skipped: 0,
    };
    if spec.model.media.is_empty() {
        return Ok(report);
    }

    let images_dir = spec.output_dir.join(&spec.model.images_dir);
    report.images_dir = Some(images_dir.clone());
    let Some(fetcher) = fetcher else {
        report.skipped = spec.model.media.len();
        return Ok(report);
    };
    fs::create_dir_all(&images_dir)?;

    for reference in &spec.model.media {
        let target = images_dir.join(&reference.filename);
        let shown = normalize_path(&target, Some(&spec.output_dir));
        match fetcher
            .download(&reference.url)
            .and_then(|bytes| Ok(fs::write(&target, &bytes).map(|_| bytes.len())?))
        {
            Ok(size) => {
                info!(path = %shown, kb = size / 1024, "image saved");
                report.saved.push(target);
            }
            Err(err) => {
                warn!(path = %shown, url = %reference.url, error = %err, "image download failed");
                report.failed.push(MediaFailure {
                    reference: reference.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::media::MediaRole;
    use crate::document::DocumentKind;
    use crate::error::Error;
    use crate::ir::nodes::{Document, Paragraph};
    use tempfile::tempdir;

    struct FakeFetcher;

    impl MediaFetcher for FakeFetcher {
        fn download(&self, url: &str) -> Result<Vec<u8>> {
            if url.contains("broken") {
                Err(Error::Api("HTTP 500".to_string()))
            } else {
                Ok(url.as_bytes().to_vec())
            }
        }
    }

    fn model() -> DocumentModel {
        DocumentModel {
            document: Document {
                children: vec![Paragraph::text("hello").into()],
            },
            media: vec![
                MediaReference {
                    url: "https://img/ok.png".to_string(),
                    role: MediaRole::Attachment(1),
                    filename: "1.png".to_string(),
                },
                MediaReference {
                    url: "https://img/broken.jpg".to_string(),
                    role: MediaRole::Attachment(2),
                    filename: "2.jpg".to_string(),
                },
            ],
            base_name: "alice_1".to_string(),
            images_dir: "alice_1_images".to_string(),
            kind: DocumentKind::Post,
        }
    }

    #[test]
    fn writes_document_and_collects_failures() {
        let dir = tempdir().unwrap();
        let model = model();
        let report = publish(PublishSpec::new(&model, dir.path()), Some(&FakeFetcher)).unwrap();

        assert_eq!(report.document_path, dir.path().join("alice_1.md"));
        assert_eq!(fs::read_to_string(&report.document_path).unwrap(), "hello\n");
        assert_eq!(
            fs::read(dir.path().join("alice_1_images/1.png")).unwrap(),
            b"https://img/ok.png"
        );
        assert_eq!(report.saved.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].reference.filename, "2.jpg");
    }

    #[test]
    fn json_format_uses_its_extension() {
        let dir = tempdir().unwrap();
        let model = model();
        let report = publish(
            PublishSpec::new(&model, dir.path()).with_format("json"),
            None,
        )
        .unwrap();
        assert_eq!(report.document_path, dir.path().join("alice_1.json"));
        assert_eq!(report.skipped, 2);
        assert!(!dir.path().join("alice_1_images").exists());
    }

    #[test]
    fn unknown_format_is_an_error() {
        let dir = tempdir().unwrap();
        let model = model();
        assert!(matches!(
            publish(PublishSpec::new(&model, dir.path()).with_format("pdf"), None),
            Err(Error::FormatNotFound(_))
        ));
    }
}
