//! # Configuration
//!
//! Optional TOML file read with `--config`. Every field has a default, so
//! an empty file and a missing `--config` behave the same.
//!
//! ```toml
//! [logging]
//! format = "json"
//! filter = "schemes=debug"
//!
//! [search]
//! from_roots = true
//! case_sensitive = false
//!
//! [output]
//! sort_before_save = true
//! json = false
//! ```

use schemes_core::SchemeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filter used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str = "schemes=info,schemes_core=info";

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "schemes=debug,schemes_core=debug";

/// Largest configuration file accepted (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// An `EnvFilter` directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// `[search]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search breadth-first from the roots instead of in member order.
    pub from_roots: bool,
    /// Case sensitivity of `--contains`.
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            from_roots: false,
            case_sensitive: true,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Half-sort a scheme before writing it.
    pub sort_before_save: bool,
    /// Print command results as JSON.
    pub json: bool,
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Parse a configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemeError> {
        toml::from_str(text)
            .map_err(|e| SchemeError::InvalidArgument(format!("Invalid configuration: {}", e)))
    }

    /// Read the file at `path`, or return the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, SchemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SchemeError::InvalidArgument(format!(
                "Configuration file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.search.case_sensitive);
        assert!(!config.output.sort_before_save);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str("[search]\nfrom_roots = true\n").expect("parse");
        assert!(config.search.from_roots);
        assert!(config.search.case_sensitive);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = AppConfig::from_toml_str("[logging]\nformat = \"yaml\"\n").expect_err("format");
        assert!(matches!(err, SchemeError::InvalidArgument(_)));
    }

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(AppConfig::load(None).expect("load"), AppConfig::default());
    }
}
