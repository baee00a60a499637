//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::types::{ExtractionPath, Summary};
use folio_codec::markup::{self, MarkupEngine};
use folio_codec::{canonical, CodecError};
use serde_json::Value;
use tracing::{debug, trace};

/// The Extractor turns a Document string into a single-line summary
///
/// Extraction is a pure function of the input, the limit, and the
/// configuration; it never fails.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create a new Extractor, validating the configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Summarize with the configured maximum length
    pub fn summarize(&self, content: &str) -> Summary {
        self.summarize_with_limit(content, self.config.max_length)
    }

    /// Summarize, truncating to `max_length` characters plus the ellipsis
    pub fn summarize_with_limit(&self, content: &str, max_length: usize) -> Summary {
        let (text, path) = self.raw_text(content);
        let text = if self.config.collapse_whitespace {
            markup::collapse_whitespace(&text)
        } else {
            text
        };

        let (text, truncated) = truncate(text, max_length, &self.config.ellipsis);
        trace!("Summary via {} (truncated: {})", path, truncated);
        Summary {
            text,
            truncated,
            path,
        }
    }

    /// Summary text for `content`, at most `max_length` characters plus the ellipsis
    pub fn extract(&self, content: &str, max_length: usize) -> String {
        self.summarize_with_limit(content, max_length).text
    }

    /// Multi-line plain text for a preview pane
    ///
    /// Canonical blocks are joined with newlines and nothing is truncated.
    /// A string that is not JSON is returned as is; JSON without the canonical
    /// shape has no previewable text.
    pub fn preview(&self, content: &str) -> String {
        match canonical::parse_tree(content) {
            Ok(tree) => canonical::root_children(&tree)
                .map(|blocks| join_blocks(blocks, "\n"))
                .unwrap_or_default(),
            Err(CodecError::Json(_)) => content.to_string(),
            Err(CodecError::NotCanonical(_)) => String::new(),
        }
    }

    fn raw_text(&self, content: &str) -> (String, ExtractionPath) {
        if let Ok(tree) = canonical::parse_tree(content) {
            if let Some(blocks) = canonical::root_children(&tree) {
                return (
                    join_blocks(blocks, &self.config.block_separator),
                    ExtractionPath::Canonical,
                );
            }
        }

        match self.config.backend.effective() {
            MarkupEngine::Dom => (
                markup::text_content(content, MarkupEngine::Dom),
                ExtractionPath::Markup,
            ),
            MarkupEngine::Regex => {
                debug!("Extracting with regex tag stripping");
                (markup::strip_tags(content), ExtractionPath::RegexFallback)
            }
        }
    }
}

/// Summary of `content` with the default configuration
pub fn extract_plain_text(content: &str, max_length: usize) -> String {
    TextExtractor::default().extract(content, max_length)
}

fn join_blocks(blocks: &[Value], separator: &str) -> String {
    blocks
        .iter()
        .map(node_text)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Text payload of a node; containers join their children with spaces
fn node_text(node: &Value) -> String {
    if let Some(text) = node.get("text").and_then(|v| v.as_str()) {
        return text.to_string();
    }
    match node.get("children").and_then(|v| v.as_array()) {
        Some(children) => children
            .iter()
            .map(node_text)
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

fn truncate(text: String, max_length: usize, ellipsis: &str) -> (String, bool) {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => {
            let mut short = text[..cut].to_string();
            short.push_str(ellipsis);
            (short, true)
        }
        None => (text, false),
    }
}
