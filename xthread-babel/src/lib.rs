//! Converts X/Twitter posts, threads and long-form articles into Markdown documents
//!
//!     A post is fetched once, turned into a nested, format-agnostic IR (./ir/mod.rs) and then
//!     serialized by one of the registered formats. Markdown is the primary output; JSON and
//!     plain text exist mostly for inspection.
//!
//!     This is a pure lib: it powers the `xthread` binary but never prints, reads the
//!     environment or exits. Progress is reported through `tracing`.
//!
//! Architecture
//!
//!     raw API JSON ─► source::fxtwitter ─► model::Post
//!                                              │
//!                        document::build_document (layout choice)
//!                          │                    │
//!                 thread::reconstruct_thread    common::flat_to_nested (article blocks)
//!                          │                    │
//!                          └──► ir::nodes::Document + MediaReference list
//!                                              │
//!                       formats::{markdown, json, text} ─► publish (disk + images)
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model.rs                # Posts, articles, rich-text blocks
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown            # serializer.rs + snippet parser.rs (comrak)
//!     │   ├── json
//!     │   └── text
//!     ├── ir                      # Intermediate Representation
//!     ├── common                  # Inline/block rendering, list assembly, media names
//!     ├── source                  # PostSource / MediaFetcher, URL parsing, HTTP client
//!     ├── thread.rs               # Bounded same-author reply walk
//!     ├── document.rs             # Post / thread / article layouts
//!     └── publish.rs              # Writing documents and images
//!
//! Core Algorithms
//!
//!     Two parts need real care. Inline rendering (./common/inline.rs) resolves arbitrarily
//!     overlapping style ranges through an interval partition. List assembly
//!     (./common/flat_to_nested.rs) rebuilds nested lists from flat, depth-annotated blocks with
//!     an explicit stack. Both are tested in isolation; the layouts only compose them.
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # declares the modules below
//!     ├── common                  # fixtures loader
//!     ├── <area>.rs
//!     └── fixtures/*.json         # saved API responses
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.

pub mod common;
pub mod document;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod model;
pub mod publish;
pub mod registry;
pub mod source;
pub mod thread;

pub use common::media::{MediaReference, MediaResolver, MediaRole};
pub use document::{build_document, DocumentKind, DocumentModel, DocumentOptions, RenderedDocument};
pub use error::{Error, Result};
pub use format::Format;
pub use registry::FormatRegistry;
pub use source::url::{parse_post_url, PostUrl};
pub use source::{MediaFetcher, PostSource};
pub use thread::{reconstruct_thread, StopReason, Thread, ThreadOptions};
