//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available output formats.
//! Formats can be registered and retrieved by name.

use crate::error::{Error, Result};
use crate::format::Format;
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let markdown = registry.serialize(&doc, "markdown")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| Error::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(Error::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::json::JsonFormat);
        registry.register(crate::formats::text::TextFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::Paragraph;

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn serialize(&self, _doc: &Document) -> Result<String> {
            Ok("test output".to_string())
        }
    }

    fn sample() -> Document {
        Document {
            children: vec![Paragraph::text("Hello").into()],
        }
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.serialize(&sample(), "nonexistent") {
            Err(Error::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected FormatNotFound error, got {other:?}"),
        }
    }

    struct NameOnlyFormat;
    impl Format for NameOnlyFormat {
        fn name(&self) -> &str {
            "name-only"
        }
    }

    #[test]
    fn test_registry_serialize_unsupported() {
        let mut registry = FormatRegistry::new();
        registry.register(NameOnlyFormat);
        assert!(matches!(
            registry.serialize(&sample(), "name-only"),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "markdown", "text"]);
    }

    #[test]
    fn test_default_extensions() {
        let registry = FormatRegistry::with_defaults();
        let first = |name: &str| registry.get(name).unwrap().file_extensions()[0].to_string();
        assert_eq!(first("markdown"), "md");
        assert_eq!(first("json"), "json");
        assert_eq!(first("text"), "txt");
    }

    #[test]
    fn test_markdown_through_registry() {
        let registry = FormatRegistry::default();
        let markdown = registry.serialize(&sample(), "markdown").unwrap();
        assert_eq!(markdown, "Hello\n");
    }
}
