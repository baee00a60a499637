//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the content core and the
//! engines and services around it. Implementations live in other crates.

use crate::{Article, ArticlePayload, BlockKind, Category, Document, Selection, TextFormat};

/// A rich-text editing engine
///
/// Implemented by `folio-editor` (`MemorySurface`). The editor adapter only
/// talks to the engine through this trait, so engines are swappable.
///
/// Every mutating call operates on the current selection and leaves the
/// document in a state that passes `Document::validate`.
pub trait EditingSurface {
    /// Error type for engine operations
    ///
    /// Errors are invariant violations inside the engine, never bad user input.
    type Error;

    /// Replace the whole document and put the caret at its start
    fn load(&mut self, document: Document) -> Result<(), Self::Error>;

    /// The current document
    fn document(&self) -> &Document;

    /// The current selection
    fn selection(&self) -> Selection;

    /// Move the selection; positions are clamped to the document
    fn set_selection(&mut self, selection: Selection) -> Result<(), Self::Error>;

    /// Replace the selection with text
    fn insert_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Delete the selection, or the character before a caret
    fn delete_backward(&mut self) -> Result<(), Self::Error>;

    /// Split the block at the selection (Enter)
    fn insert_paragraph(&mut self) -> Result<(), Self::Error>;

    /// Insert a hard line break (Shift+Enter)
    fn insert_line_break(&mut self) -> Result<(), Self::Error>;

    /// Toggle formatting flags on the selected text
    fn toggle_format(&mut self, format: TextFormat) -> Result<(), Self::Error>;

    /// Convert every block the selection touches to `kind`
    fn set_block_kind(&mut self, kind: BlockKind) -> Result<(), Self::Error>;

    /// Set or clear the link target of the selected text
    fn set_link(&mut self, url: Option<&str>) -> Result<(), Self::Error>;

    /// Plain text covered by the selection
    fn selected_text(&self) -> String;
}

/// The remote content service
///
/// Implemented outside the core; the article form only sees this trait.
pub trait ContentApi {
    /// Error type for API operations
    type Error;

    /// Load one article by identifier
    fn fetch_article(&self, id: &str) -> Result<Article, Self::Error>;

    /// All categories
    fn list_categories(&self) -> Result<Vec<Category>, Self::Error>;

    /// Upload an image and return its public URL
    fn upload_image(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, Self::Error>;

    /// Create an article
    fn create_article(&mut self, payload: &ArticlePayload) -> Result<Article, Self::Error>;

    /// Update an existing article
    fn update_article(&mut self, id: &str, payload: &ArticlePayload) -> Result<Article, Self::Error>;
}
