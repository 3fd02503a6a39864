//! Shared configuration loader for the xthread toolchain.
//!
//! `defaults/xthread.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`XthreadConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xthread_babel::document::DocumentOptions;
use xthread_babel::source::client::ClientConfig;
use xthread_babel::thread::ThreadOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/xthread.default.toml");

/// Name of the optional per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = "xthread.toml";

/// Top-level configuration consumed by xthread applications.
#[derive(Debug, Clone, Deserialize)]
pub struct XthreadConfig {
    pub fetch: FetchConfig,
    pub thread: ThreadConfig,
    pub output: OutputConfig,
}

/// HTTP retrieval settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub media_timeout_secs: u64,
    pub request_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ThreadConfig {
    pub enabled: bool,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub images_dir_suffix: String,
    pub format: String,
}

impl From<&FetchConfig> for ClientConfig {
    fn from(config: &FetchConfig) -> Self {
        ClientConfig {
            api_base: config.api_base.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            media_timeout: Duration::from_secs(config.media_timeout_secs),
            request_delay: Duration::from_millis(config.request_delay_ms),
        }
    }
}

impl From<ThreadConfig> for ThreadOptions {
    fn from(config: ThreadConfig) -> Self {
        ThreadOptions {
            enabled: config.enabled,
            max_depth: config.max_depth,
        }
    }
}

impl XthreadConfig {
    /// Document options for a render of `source_url`.
    pub fn document_options(&self, source_url: Option<String>) -> DocumentOptions {
        DocumentOptions {
            source_url,
            images_dir_suffix: self.output.images_dir_suffix.clone(),
            thread: self.thread.into(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<XthreadConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<XthreadConfig, ConfigError> {
    Loader::new().build()
}
