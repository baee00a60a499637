//! Configuration for the editor adapter and article form

use crate::error::{EditorError, Result};
use folio_codec::MarkupEngine;
use serde::{Deserialize, Serialize};

/// Configuration for the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo steps kept; 0 disables history
    pub history_depth: usize,

    /// Minimum snapshot length (characters) copied into the form's content field
    pub content_sync_threshold: usize,

    /// How legacy markup is translated on initialization
    pub markup_engine: MarkupEngine,
}

impl EditorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.history_depth > 10_000 {
            return Err("history_depth cannot exceed 10000".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate().map_err(EditorError::Config)?;
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            content_sync_threshold: 20,
            markup_engine: MarkupEngine::Dom,
        }
    }
}
