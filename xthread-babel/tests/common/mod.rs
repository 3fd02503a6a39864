//! Fixture loading shared by the integration tests.

use std::fs;
use std::path::PathBuf;

use xthread_babel::model::Post;
use xthread_babel::source::fxtwitter::parse_saved;
use xthread_babel::source::memory::MemorySource;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw contents of `tests/fixtures/<name>`.
pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Posts of a saved API dump, in file order.
pub fn load_posts(name: &str) -> Vec<Post> {
    parse_saved(&fixture(name)).expect("fixture to parse")
}

/// The first post of a dump, plus a source holding every post of it.
pub fn load_source(name: &str) -> (Post, MemorySource) {
    let posts = load_posts(name);
    let start = posts.first().cloned().expect("fixture to hold a post");
    (start, MemorySource::with_posts(posts))
}
