//! Format trait definition
//!
//! This module defines the core Format trait that all output formats implement.
//! The trait provides a uniform interface for serializing IR documents.

use crate::error::{Error, Result};
use crate::ir::nodes::Document;

/// Trait for document formats
///
/// Implementors turn the IR [`Document`] into a string representation.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// The first one is used when writing output files.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports serialization (Document → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Serialize a Document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Document) -> Result<String> {
        Err(Error::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
