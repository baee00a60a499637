//! Folio Editor
//!
//! The editing side of article content: an in-memory rich-text engine, the
//! adapter that keeps it in sync with the canonical Document string, and
//! the article form built on top.
//!
//! # Architecture
//!
//! ```text
//! stored content ─► EditorAdapter ─► EditingSurface (MemorySurface)
//!                        │
//!                        └─► ChangeEvent { content, selected_text } ─► ArticleForm
//! ```
//!
//! # Example Usage
//!
//! ```
//! use folio_editor::{EditorAdapter, EditorConfig, MemorySurface};
//! use folio_domain::{Position, Selection};
//!
//! let mut editor = EditorAdapter::with_content(
//!     MemorySurface::new(),
//!     EditorConfig::default(),
//!     Some("<p>Hello world</p>"),
//! )?;
//!
//! editor.select(Selection::range(Position::new(0, 6), Position::new(0, 11)))?;
//! editor.toggle_bold()?;
//!
//! let canonical = editor.content();
//! assert!(canonical.starts_with(r#"{"root":"#));
//! # Ok::<(), folio_editor::EditorError>(())
//! ```

#![warn(missing_docs)]

pub mod adapter;
mod config;
mod error;
pub mod form;
pub mod history;
pub mod surface;

#[cfg(test)]
mod tests;

pub use adapter::{ChangeEvent, EditorAdapter, ListenerId};
pub use config::EditorConfig;
pub use error::{EditorError, Result, SurfaceError};
pub use form::{ArticleForm, FormMode, PendingSubmission, Preview};
pub use surface::MemorySurface;
