//! Rendering building blocks shared by the document builders.

pub mod blocks;
pub mod flat_to_nested;
pub mod inline;
pub mod media;
pub mod meta;
pub(crate) mod paths;
