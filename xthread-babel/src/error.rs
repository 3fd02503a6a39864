//! Error types for retrieval, rendering and format operations

use thiserror::Error;

/// Result type alias for xthread-babel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching, rendering or writing a document
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be understood as a post URL
    #[error("invalid post URL: {0}")]
    InvalidUrl(String),

    /// The URL host is not one of the known mirrors
    #[error("unsupported domain '{domain}' (supported: {supported})")]
    UnsupportedDomain { domain: String, supported: String },

    /// The post does not exist or was deleted
    #[error("post not found: {0}")]
    NotFound(String),

    /// The API answered, but not with a usable post
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system failure while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Format not found in registry
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    /// Error while parsing a document in some format
    #[error("parse error: {0}")]
    Parse(String),

    /// The format does not implement the requested direction
    #[error("operation not supported: {0}")]
    NotSupported(String),
}
