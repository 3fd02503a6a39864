//! Intermediate Representation (IR) for rendered documents.
//!
//! This module defines a format-agnostic, nested representation of the output
//! document. Renderers build it from posts and rich-text blocks; formats
//! (Markdown, JSON, plain text) serialize it.

pub mod nodes;
