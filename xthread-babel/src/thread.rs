//! Reconstruction of same-author reply chains.
//!
//! The walk runs in two independent directions from the start post, each an explicit
//! state machine: every step either yields the next post or stops with a
//! [`StopReason`]. Both directions share one visited set, so a post can never appear
//! twice and reply cycles always terminate.
//!
//! - **Backward:** follow `reply_to` while the parent exists and has the same author.
//! - **Forward:** among the direct replies of the current post, take the earliest one by
//!   the same author that has not been visited yet.
//!
//! Each direction adds at most `max_depth` posts. Failed lookups truncate the chain
//! instead of failing the render.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::model::{Author, Post};
use crate::source::PostSource;

/// Default bound for each walk direction.
pub const DEFAULT_MAX_DEPTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadOptions {
    /// When false the thread is just the start post
    pub enabled: bool,
    /// Maximum number of posts added per direction
    pub max_depth: usize,
}

impl Default for ThreadOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Why a walk direction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The first post is not a reply
    NoPredecessor,
    /// The last post has no replies
    NoSuccessor,
    /// The neighbouring post belongs to someone else
    AuthorChanged,
    /// `max_depth` posts were added
    BoundReached,
    /// The next post was already part of the chain
    CycleDetected,
    /// A lookup failed; the chain so far is kept
    FetchFailed,
    /// Thread mode is off
    Disabled,
}

impl StopReason {
    /// Whether the chain may be missing posts.
    pub fn is_truncation(self) -> bool {
        matches!(
            self,
            StopReason::BoundReached | StopReason::CycleDetected | StopReason::FetchFailed
        )
    }
}

/// An ordered chain of posts by one author.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Oldest first; never empty
    pub posts: Vec<Post>,
    /// Index of the post the walk started from
    pub start: usize,
    pub backward: StopReason,
    pub forward: StopReason,
}

impl Thread {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// More than one post.
    pub fn is_thread(&self) -> bool {
        self.posts.len() > 1
    }
}

enum Step {
    Next(Post),
    Stop(StopReason),
}

/// Builds the thread around `start`.
pub fn reconstruct_thread(
    start: Post,
    source: &dyn PostSource,
    options: &ThreadOptions,
) -> Thread {
    if !options.enabled {
        return Thread {
            posts: vec![start],
            start: 0,
            backward: StopReason::Disabled,
            forward: StopReason::Disabled,
        };
    }

    let author = start.author.clone();
    let mut visited = HashSet::from([start.id.clone()]);

    let (mut before, backward) = walk(&start, options.max_depth, |current| {
        step_backward(current, &author, source, &mut visited)
    });
    let (after, forward) = walk(&start, options.max_depth, |current| {
        step_forward(current, &author, source, &mut visited)
    });

    for (direction, reason) in [("backward", backward), ("forward", forward)] {
        if reason.is_truncation() {
            warn!(direction, ?reason, "thread walk truncated");
        } else {
            debug!(direction, ?reason, "thread walk finished");
        }
    }

    before.reverse();
    let start_index = before.len();
    let mut posts = before;
    posts.push(start);
    posts.extend(after);

    if posts.len() > 1 {
        info!(posts = posts.len(), author = %author.handle, "thread found");
    }

    Thread {
        posts,
        start: start_index,
        backward,
        forward,
    }
}

fn walk(
    start: &Post,
    max_depth: usize,
    mut step: impl FnMut(&Post) -> Step,
) -> (Vec<Post>, StopReason) {
    let mut chain: Vec<Post> = Vec::new();
    loop {
        if chain.len() >= max_depth {
            return (chain, StopReason::BoundReached);
        }
        let current = chain.last().unwrap_or(start);
        match step(current) {
            Step::Next(post) => chain.push(post),
            Step::Stop(reason) => return (chain, reason),
        }
    }
}

fn step_backward(
    current: &Post,
    author: &Author,
    source: &dyn PostSource,
    visited: &mut HashSet<String>,
) -> Step {
    let Some(parent_id) = current.reply_to.as_deref() else {
        return Step::Stop(StopReason::NoPredecessor);
    };
    if visited.contains(parent_id) {
        return Step::Stop(StopReason::CycleDetected);
    }

    let parent = match source.fetch_post(parent_id) {
        Ok(parent) => parent,
        Err(err) => {
            warn!(id = parent_id, error = %err, "could not fetch parent post");
            return Step::Stop(StopReason::FetchFailed);
        }
    };
    if !parent.author.same_as(author) {
        return Step::Stop(StopReason::AuthorChanged);
    }

    visited.insert(parent_id.to_string());
    visited.insert(parent.id.clone());
    Step::Next(parent)
}

fn step_forward(
    current: &Post,
    author: &Author,
    source: &dyn PostSource,
    visited: &mut HashSet<String>,
) -> Step {
    let replies = match source.fetch_replies(&current.id) {
        Ok(replies) => replies,
        Err(err) => {
            warn!(id = %current.id, error = %err, "could not fetch replies");
            return Step::Stop(StopReason::FetchFailed);
        }
    };
    if replies.is_empty() {
        return Step::Stop(StopReason::NoSuccessor);
    }

    let own: Vec<Post> = replies
        .into_iter()
        .filter(|reply| reply.reply_to.as_deref() == Some(current.id.as_str()))
        .filter(|reply| reply.author.same_as(author))
        .collect();
    if own.is_empty() {
        return Step::Stop(StopReason::AuthorChanged);
    }

    match own
        .into_iter()
        .filter(|reply| !visited.contains(&reply.id))
        .min_by(|a, b| id_order(&a.id).cmp(&id_order(&b.id)))
    {
        Some(next) => {
            visited.insert(next.id.clone());
            Step::Next(next)
        }
        None => Step::Stop(StopReason::CycleDetected),
    }
}

/// Post ids are decimal snowflakes, so a shorter id is older.
fn id_order(id: &str) -> (usize, &str) {
    (id.len(), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;

    fn post(id: &str, handle: &str, reply_to: Option<&str>) -> Post {
        Post {
            id: id.to_string(),
            author: Author {
                handle: handle.to_string(),
                ..Author::default()
            },
            reply_to: reply_to.map(str::to_string),
            ..Post::default()
        }
    }

    fn ids(thread: &Thread) -> Vec<&str> {
        thread.posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn disabled_returns_start_only() {
        let source = MemorySource::with_posts([post("1", "a", None), post("2", "a", Some("1"))]);
        let thread = reconstruct_thread(
            post("2", "a", Some("1")),
            &source,
            &ThreadOptions {
                enabled: false,
                ..ThreadOptions::default()
            },
        );
        assert_eq!(ids(&thread), ["2"]);
        assert_eq!(thread.backward, StopReason::Disabled);
    }

    #[test]
    fn walks_both_directions_in_creation_order() {
        let source = MemorySource::with_posts([
            post("10", "alice", None),
            post("11", "Alice", Some("10")),
            post("12", "alice", Some("11")),
            post("13", "alice", Some("12")),
            post("14", "bob", Some("13")),
        ]);
        let start = source.fetch_post("12").unwrap();
        let thread = reconstruct_thread(start, &source, &ThreadOptions::default());

        assert_eq!(ids(&thread), ["10", "11", "12", "13"]);
        assert_eq!(thread.posts[thread.start].id, "12");
        assert_eq!(thread.backward, StopReason::NoPredecessor);
        assert_eq!(thread.forward, StopReason::AuthorChanged);
    }

    #[test]
    fn backward_stops_at_other_author() {
        let source = MemorySource::with_posts([
            post("1", "bob", None),
            post("2", "alice", Some("1")),
        ]);
        let thread = reconstruct_thread(
            source.fetch_post("2").unwrap(),
            &source,
            &ThreadOptions::default(),
        );
        assert_eq!(ids(&thread), ["2"]);
        assert_eq!(thread.backward, StopReason::AuthorChanged);
        assert_eq!(thread.forward, StopReason::NoSuccessor);
    }

    #[test]
    fn forward_picks_earliest_own_reply() {
        let source = MemorySource::with_posts([
            post("100", "a", None),
            post("300", "a", Some("100")),
            post("200", "a", Some("100")),
            post("150", "b", Some("100")),
        ]);
        let thread = reconstruct_thread(
            source.fetch_post("100").unwrap(),
            &source,
            &ThreadOptions::default(),
        );
        assert_eq!(ids(&thread), ["100", "200"]);
    }

    #[test]
    fn cycles_terminate() {
        let source = MemorySource::with_posts([
            post("1", "a", Some("3")),
            post("2", "a", Some("1")),
            post("3", "a", Some("2")),
        ]);
        let thread = reconstruct_thread(
            source.fetch_post("3").unwrap(),
            &source,
            &ThreadOptions::default(),
        );
        assert!(!thread.is_empty());
        assert_eq!(ids(&thread), ["1", "2", "3"]);
        assert_eq!(thread.backward, StopReason::CycleDetected);
        assert_eq!(thread.forward, StopReason::CycleDetected);
    }

    #[test]
    fn missing_parent_truncates() {
        let source = MemorySource::with_posts([post("2", "a", Some("1"))]);
        let thread = reconstruct_thread(
            source.fetch_post("2").unwrap(),
            &source,
            &ThreadOptions::default(),
        );
        assert_eq!(ids(&thread), ["2"]);
        assert_eq!(thread.backward, StopReason::FetchFailed);
    }

    #[test]
    fn each_direction_is_bounded() {
        let mut posts = vec![post("1", "a", None)];
        for n in 2..=9 {
            posts.push(post(&n.to_string(), "a", Some(&(n - 1).to_string())));
        }
        let source = MemorySource::with_posts(posts);
        let thread = reconstruct_thread(
            source.fetch_post("5").unwrap(),
            &source,
            &ThreadOptions {
                enabled: true,
                max_depth: 2,
            },
        );
        assert_eq!(ids(&thread), ["3", "4", "5", "6", "7"]);
        assert_eq!(thread.backward, StopReason::BoundReached);
        assert_eq!(thread.forward, StopReason::BoundReached);
    }
}
