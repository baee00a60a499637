//! Folio Extractor
//!
//! Produces short plain-text summaries of article bodies for cards and
//! listings, and multi-line text for preview panes.
//!
//! # Fallback chain
//!
//! ```text
//! Document string ─┬─ canonical JSON? ── block text, space-joined
//!                  ├─ markup (DOM)    ── text content
//!                  └─ regex fallback  ── tags stripped
//!                           │
//!                  collapse whitespace → truncate + "..."
//! ```
//!
//! # Example Usage
//!
//! ```
//! use folio_extractor::{extract_plain_text, TextExtractor, ExtractorConfig};
//!
//! let stored = r#"{"root":{"children":[{"children":[{"text":"Hello world"}]}]}}"#;
//! assert_eq!(extract_plain_text(stored, 5), "Hello...");
//!
//! let extractor = TextExtractor::new(ExtractorConfig::regex_only()).unwrap();
//! assert_eq!(extractor.summarize("<p>Hello <b>world</b></p>").text, "Hello world");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod types;


pub use config::{ExtractorConfig, DEFAULT_MAX_LENGTH};
pub use error::ExtractorError;
pub use extractor::{extract_plain_text, TextExtractor};
pub use folio_codec::MarkupEngine;
pub use types::{ExtractionPath, Summary};
