//! JSON format: a serde dump of the IR tree.
//!
//! Useful for inspecting what the renderers produced, and as a stable
//! machine-readable output.

use crate::error::Result;
use crate::format::Format;
use crate::ir::nodes::Document;

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "IR tree as pretty-printed JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String> {
        let mut out = serde_json::to_string_pretty(doc)?;
        out.push('\n');
        Ok(out)
    }
}
