//! Result types for extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which step of the fallback chain produced a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    /// Text read from the canonical JSON tree
    Canonical,
    /// Text content of parsed markup
    Markup,
    /// Regular-expression tag stripping
    RegexFallback,
}

impl ExtractionPath {
    /// Snake-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionPath::Canonical => "canonical",
            ExtractionPath::Markup => "markup",
            ExtractionPath::RegexFallback => "regex_fallback",
        }
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain-text summary of a Document string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text, ellipsis included when truncated
    pub text: String,

    /// Whether the text was cut
    pub truncated: bool,

    /// How the text was obtained
    pub path: ExtractionPath,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
