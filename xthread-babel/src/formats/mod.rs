//! Output format implementations
//!
//! Each format converts the IR [`Document`](crate::ir::nodes::Document) to its own
//! representation. Register them through
//! [`FormatRegistry`](crate::registry::FormatRegistry).

pub mod json;
pub mod markdown;
pub mod text;
