//! Folio Domain Layer
//!
//! This crate holds the in-memory model of an article body and the trait
//! interfaces the rest of the workspace depends upon. It carries no parsing,
//! serialization format, or I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Document**: an ordered sequence of blocks, each holding inline nodes
//! - **TextFormat**: independent formatting flags on a text run
//! - **Selection**: anchor/focus positions addressed by block and character offset
//! - **EditingSurface**: the swappable rich-text engine behind the editor adapter
//! - **ContentApi**: the remote content service (articles, categories, uploads)
//!
//! ## Architecture
//!
//! - Pure model logic only
//! - Codecs live in `folio-codec`, engines and forms in `folio-editor`
//! - Trait definitions for every external interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod document;
pub mod format;
pub mod selection;
pub mod traits;

// Re-exports for convenience
pub use article::{Article, ArticlePayload, Category};
pub use document::{Block, BlockKind, Document, Inline, ListKind, TextRun};
pub use format::TextFormat;
pub use selection::{Position, Selection};
