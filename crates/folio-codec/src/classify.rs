//! Telling canonical content from legacy markup
//!
//! A Document string carries no explicit tag saying which encoding it uses.
//! Classification is a decode attempt: whatever decodes as canonical form
//! is canonical, everything else (including the empty string) is legacy.

use crate::canonical;
use crate::legacy;
use crate::markup::MarkupEngine;
use folio_domain::Document;
use std::fmt;
use tracing::debug;

/// Which encoding a Document string uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// JSON editor-state tree
    Canonical,
    /// Raw markup from the older content path
    Legacy,
}

impl Encoding {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Canonical => "canonical",
            Encoding::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified Document string
#[derive(Debug, Clone, PartialEq)]
pub enum StoredContent {
    /// Decoded canonical tree
    Canonical(Document),
    /// Markup still to be translated
    Legacy(String),
}

impl StoredContent {
    /// Classify a Document string
    ///
    /// Total: every input selects exactly one variant.
    pub fn classify(content: &str) -> Self {
        match canonical::decode(content) {
            Ok(document) => {
                debug!("Content is canonical ({} blocks)", document.block_count());
                StoredContent::Canonical(document)
            }
            Err(e) => {
                debug!("Content is legacy markup: {}", e);
                StoredContent::Legacy(content.to_string())
            }
        }
    }

    /// The encoding this content was classified as
    pub fn encoding(&self) -> Encoding {
        match self {
            StoredContent::Canonical(_) => Encoding::Canonical,
            StoredContent::Legacy(_) => Encoding::Legacy,
        }
    }

    /// Convert into a document, translating legacy markup with `engine`
    ///
    /// The result may have no blocks.
    pub fn into_document(self, engine: MarkupEngine) -> Document {
        match self {
            StoredContent::Canonical(document) => document,
            StoredContent::Legacy(markup) => legacy::translate(&markup, engine),
        }
    }
}
