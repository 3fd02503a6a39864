//! Writing rendered documents and their images to disk.

use std::fs;
use std::sync::Mutex;

use tempfile::tempdir;
use xthread_babel::document::{build_document, DocumentOptions};
use xthread_babel::publish::{publish, PublishSpec};
use xthread_babel::{Error, MediaFetcher, Result};

use crate::common::load_source;

/// Serves every URL except those containing `cover`, and records what was asked.
#[derive(Default)]
struct RecordingFetcher {
    requested: Mutex<Vec<String>>,
}

impl MediaFetcher for RecordingFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.lock().unwrap().push(url.to_string());
        if url.contains("cover") {
            return Err(Error::Api("HTTP 403".to_string()));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

#[test]
fn article_is_written_with_its_images() {
    let dir = tempdir().unwrap();
    let (start, source) = load_source("article.json");
    let model = build_document(start, &source, &DocumentOptions::default()).unwrap();
    let fetcher = RecordingFetcher::default();

    let report = publish(PublishSpec::new(&model, dir.path()), Some(&fetcher)).unwrap();

    let document = fs::read_to_string(dir.path().join("alice_1820000000000000001.md")).unwrap();
    assert!(document.starts_with("# Shipping Rust at Scale\n"));

    let images = dir.path().join("alice_1820000000000000001_images");
    assert_eq!(report.images_dir.as_deref(), Some(images.as_path()));
    assert_eq!(fs::read(images.join("article_1.png")).unwrap(), [0x89, b'P', b'N', b'G']);
    assert!(!images.join("cover.jpg").exists());

    // A failed download does not stop the others
    assert_eq!(report.saved, [images.join("article_1.png")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].reference.filename, "cover.jpg");
    assert_eq!(fetcher.requested.lock().unwrap().len(), 2);
}

#[test]
fn text_format_writes_txt_without_images_dir() {
    let dir = tempdir().unwrap();
    let (start, source) = load_source("thread.json");
    let model = build_document(start, &source, &DocumentOptions::default()).unwrap();

    let report = publish(PublishSpec::new(&model, dir.path()).with_format("text"), None).unwrap();

    assert_eq!(
        report.document_path,
        dir.path().join("alice_1810000000000000002.txt")
    );
    let text = fs::read_to_string(&report.document_path).unwrap();
    assert!(text.contains("Second: the details."));
    assert!(!text.contains("**"));
    assert_eq!(report.skipped, 2);
    assert!(report.saved.is_empty());
}

#[test]
fn post_without_media_creates_no_images_dir() {
    let dir = tempdir().unwrap();
    let (mut start, source) = load_source("post.json");
    start.photos.clear();
    let model = build_document(start, &source, &DocumentOptions::default()).unwrap();

    let report = publish(PublishSpec::new(&model, dir.path()), None).unwrap();
    assert_eq!(report.images_dir, None);
    assert!(!dir.path().join("alice_1800000000000000001_images").exists());
}
