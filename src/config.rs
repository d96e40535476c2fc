//! Parse options
//!
//! Options can be built in code or read from a TOML file:
//!
//! ```toml
//! resolve_references = false
//! max_reference_depth = 8
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for a parse invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Load and merge external tilesets and templates. When disabled, no
    /// file besides the root document is read and reference paths are left
    /// as written.
    pub resolve_references: bool,

    /// How many files deep references may nest before the parse is aborted
    pub max_reference_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            resolve_references: true,
            max_reference_depth: 32,
        }
    }
}

impl ParseConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reference resolution
    pub fn with_resolve_references(mut self, resolve: bool) -> Self {
        self.resolve_references = resolve;
        self
    }

    /// Set the maximum nesting depth of referenced files
    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
