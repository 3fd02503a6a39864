//! Markdown format implementation
//!
//! This is the primary output of the crate.
//!
//! # Library Choice
//!
//! Serialization is hand-written (see [`serializer`]) so post text is carried verbatim;
//! comrak's CommonMark renderer escapes punctuation. comrak is only used to inspect the
//! raw Markdown snippets articles embed (see [`parser`]).
//!
//! # Element Mapping Table
//!
//! | IR Element       | Markdown                | Notes                                   |
//! |------------------|-------------------------|-----------------------------------------|
//! | Heading          | `#` .. `######`         | Level clamped to 1-6                    |
//! | Paragraph        | Paragraph               | Text emitted unescaped                  |
//! | List             | `- item` / `1. item`    | Indented `depth * 2` spaces             |
//! | BlockQuote       | `> ` prefixed lines     |                                         |
//! | CodeBlock        | Fenced block            | Fence grows past backticks in content   |
//! | Image            | `![alt](src)`           | Own paragraph                           |
//! | ThematicBreak    | `---`                   |                                         |
//! | Markdown         | Raw passthrough         | Trimmed, otherwise verbatim             |
//! | InlineContent:   |                         |                                         |
//! |   Bold / Italic  | `**x**` / `*x*`         |                                         |
//! |   Code           | `` `x` ``               |                                         |
//! |   Link           | `[text](url)`           |                                         |

pub mod parser;
pub mod serializer;

use crate::error::Result;
use crate::format::Format;
use crate::ir::nodes::Document;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String> {
        serializer::serialize_to_markdown(doc)
    }
}
