//! Folio Codec
//!
//! Reads and writes the Document string stored for every article body.
//!
//! # Encodings
//!
//! - **Canonical**: the JSON editor-state tree written by the editor
//!   ([`canonical`])
//! - **Legacy**: raw HTML from the older content path ([`legacy`])
//!
//! [`StoredContent::classify`] decides which one a string uses, and
//! [`looks_like_html`] is the cheap heuristic rendering surfaces use to pick
//! between showing markup and showing text.
//!
//! # Example
//!
//! ```
//! use folio_codec::{canonical, MarkupEngine, StoredContent};
//!
//! let stored = "<p>Hello <b>world</b></p>";
//! let document = StoredContent::classify(stored).into_document(MarkupEngine::default());
//! let canonical = canonical::encode(&document);
//!
//! assert!(matches!(StoredContent::classify(&canonical), StoredContent::Canonical(_)));
//! ```

#![warn(missing_docs)]

pub mod canonical;
pub mod classify;
mod error;
pub mod legacy;
pub mod markup;

pub use classify::{Encoding, StoredContent};
pub use error::CodecError;
pub use markup::{looks_like_html, render_mode, strip_tags, MarkupEngine, RenderMode};
