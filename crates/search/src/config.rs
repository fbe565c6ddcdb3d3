//! Searcher configuration via `sift.toml`
//!
//! Holds the defaults a request falls back to when it does not set an
//! option itself. Request options always win.

use crate::highlight::{Markers, DEFAULT_POST, DEFAULT_PRE};
use crate::options::parse_mm;
use crate::tokenizer::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sift_core::{Error, Result};
use std::path::Path;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "sift.toml";

/// Searcher defaults loaded from `sift.toml`
///
/// # Example
///
/// ```toml
/// default_language = "en"
/// default_mm = "100%"
/// highlighting_pre = "<strong>"
/// highlighting_post = "</strong>"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Language used when a request names none
    #[serde(default)]
    pub default_language: Language,
    /// Minimum-should-match used when a request sets none, e.g. `"75%"`
    #[serde(default = "default_mm_str")]
    pub default_mm: String,
    /// Opening highlight marker
    #[serde(default = "default_pre")]
    pub highlighting_pre: String,
    /// Closing highlight marker
    #[serde(default = "default_post")]
    pub highlighting_post: String,
}

fn default_mm_str() -> String {
    "100%".to_string()
}

fn default_pre() -> String {
    DEFAULT_PRE.to_string()
}

fn default_post() -> String {
    DEFAULT_POST.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            default_mm: default_mm_str(),
            highlighting_pre: default_pre(),
            highlighting_post: default_post(),
        }
    }
}

impl SearchConfig {
    /// Parse `default_mm` into a fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a percentage.
    pub fn mm(&self) -> Result<f64> {
        parse_mm(&Value::String(self.default_mm.clone()))
            .map_err(|_| Error::config(format!("invalid default_mm '{}'", self.default_mm)))
    }

    /// Default highlight markers
    pub fn markers(&self) -> Markers {
        Markers::new(self.highlighting_pre.clone(), self.highlighting_post.clone())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Sift search configuration
#
# Language used when a request does not name one. Either a single
# identifier or a list for multi-language indexes: ["en", "fr"]
default_language = "en"

# Minimum should match when a request does not set "mm".
# "100%" = every distinct query term must occur in a document
default_mm = "100%"

# Markers wrapped around highlighted matches
highlighting_pre = "<strong>"
highlighting_post = "</strong>"
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this config or
    /// `default_mm` is not a percentage.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, "config")
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {}", origin, e)))?;
        // Validate default_mm eagerly
        config.mm()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content, &format!("config file '{}'", path.display()))
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
