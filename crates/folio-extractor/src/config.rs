//! Configuration for the Extractor

use crate::error::ExtractorError;
use folio_codec::MarkupEngine;
use serde::{Deserialize, Serialize};

/// Default summary length, in characters
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum summary length (characters, before the ellipsis)
    pub max_length: usize,

    /// Appended to a truncated summary
    pub ellipsis: String,

    /// Joins the text of consecutive blocks in a summary
    pub block_separator: String,

    /// How markup is turned into text
    pub backend: MarkupEngine,

    /// Collapse whitespace runs (newlines included) to single spaces
    pub collapse_whitespace: bool,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_length == 0 {
            return Err("max_length must be greater than 0".to_string());
        }
        if self.ellipsis.contains('\n') || self.block_separator.contains('\n') {
            return Err("ellipsis and block_separator must stay on one line".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Card summaries: 100 characters, `...`, DOM backend
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ellipsis: "...".to_string(),
            block_separator: " ".to_string(),
            backend: MarkupEngine::Dom,
            collapse_whitespace: true,
        }
    }
}

impl ExtractorConfig {
    /// Server-side preset: regex tag stripping, no DOM parse
    pub fn regex_only() -> Self {
        Self {
            backend: MarkupEngine::Regex,
            ..Self::default()
        }
    }

    /// Exact preset: whitespace kept as extracted
    pub fn verbatim() -> Self {
        Self {
            collapse_whitespace: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate().map_err(ExtractorError::Config)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
