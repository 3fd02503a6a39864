//! Where posts and media bytes come from.
//!
//! The renderers only see these traits. [`client::FxTwitterClient`] implements both over
//! HTTP; [`memory::MemorySource`] serves saved responses and test data.

pub mod client;
pub mod fxtwitter;
pub mod memory;
pub mod url;

use crate::error::Result;
use crate::model::{Post, RichBlock};

/// Lookup of posts by id.
pub trait PostSource {
    /// Fetches one post. A missing post is [`Error::NotFound`](crate::Error::NotFound).
    fn fetch_post(&self, id: &str) -> Result<Post>;

    /// Direct replies to a post, in any order.
    ///
    /// Sources without a replies lookup report none, which ends a forward thread walk
    /// immediately.
    fn fetch_replies(&self, _id: &str) -> Result<Vec<Post>> {
        Ok(Vec::new())
    }

    /// Article blocks of a long-form post; empty when the post is not an article.
    fn fetch_article_blocks(&self, id: &str) -> Result<Vec<RichBlock>> {
        Ok(self
            .fetch_post(id)?
            .article
            .map(|article| article.blocks)
            .unwrap_or_default())
    }
}

/// Download of image bytes.
pub trait MediaFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}
