//! In-memory post source.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::Post;

use super::PostSource;

/// Posts held in memory, with replies derived from their `reply_to` links.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    posts: HashMap<String, Post>,
    /// Insertion order, so replies come back deterministically
    order: Vec<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut source = Self::new();
        for post in posts {
            source.insert(post);
        }
        source
    }

    /// Adds or replaces a post.
    pub fn insert(&mut self, post: Post) {
        if !self.posts.contains_key(&post.id) {
            self.order.push(post.id.clone());
        }
        self.posts.insert(post.id.clone(), post);
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl PostSource for MemorySource {
    fn fetch_post(&self, id: &str) -> Result<Post> {
        self.posts
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn fetch_replies(&self, id: &str) -> Result<Vec<Post>> {
        Ok(self
            .order
            .iter()
            .filter_map(|key| self.posts.get(key))
            .filter(|post| post.reply_to.as_deref() == Some(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, reply_to: Option<&str>) -> Post {
        Post {
            id: id.to_string(),
            reply_to: reply_to.map(str::to_string),
            ..Post::default()
        }
    }

    #[test]
    fn replies_follow_reply_links() {
        let source = MemorySource::with_posts([
            post("1", None),
            post("3", Some("1")),
            post("2", Some("1")),
        ]);
        let ids: Vec<String> = source
            .fetch_replies("1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["3", "2"]);
    }

    #[test]
    fn missing_post_is_not_found() {
        assert!(matches!(
            MemorySource::new().fetch_post("9"),
            Err(Error::NotFound(_))
        ));
    }
}
