//! Editor state adapter
//!
//! Bridges an [`EditingSurface`] to the canonical Document string. The
//! adapter classifies stored content on initialization, runs formatting
//! commands against the surface, keeps the undo history, and emits a
//! canonical snapshot to every listener after each change.

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::{History, Snapshot};
use folio_codec::{canonical, Encoding, StoredContent};
use folio_domain::traits::EditingSurface;
use folio_domain::{BlockKind, Document, ListKind, Selection, TextFormat};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// One change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Canonical form of the whole document
    pub content: String,
    /// Plain text covered by the selection
    pub selected_text: String,
}

/// Handle returned by [`EditorAdapter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Adapter between an editing surface and the canonical Document format
pub struct EditorAdapter<S: EditingSurface> {
    surface: S,
    config: EditorConfig,
    history: History,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl<S> EditorAdapter<S>
where
    S: EditingSurface,
    S::Error: fmt::Display,
{
    /// Wrap a surface; the surface keeps whatever it currently holds
    pub fn new(surface: S, config: EditorConfig) -> Self {
        let history = History::new(config.history_depth);
        Self {
            surface,
            config,
            history,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Wrap a surface and initialize it from stored content
    pub fn with_content(surface: S, config: EditorConfig, initial: Option<&str>) -> Result<Self> {
        let mut adapter = Self::new(surface, config);
        adapter.initialize(initial)?;
        Ok(adapter)
    }

    /// Load stored content into the surface
    ///
    /// Canonical content is loaded as decoded. Anything else is translated
    /// from markup; markup that yields no blocks, like absent content, gives
    /// one empty paragraph. Returns the encoding the content was read as, or
    /// `None` when there was no content. Only a surface error fails.
    pub fn initialize(&mut self, initial: Option<&str>) -> Result<Option<Encoding>> {
        let (document, encoding) = match initial {
            None => (Document::blank(), None),
            Some(content) => {
                let stored = StoredContent::classify(content);
                let encoding = stored.encoding();
                let document = stored.into_document(self.config.markup_engine);
                if document.blocks.is_empty() {
                    (Document::blank(), Some(encoding))
                } else {
                    (document, Some(encoding))
                }
            }
        };

        info!(
            "Initializing editor with {} blocks ({})",
            document.block_count(),
            encoding.map(|e| e.as_str()).unwrap_or("empty")
        );
        self.surface.load(document).map_err(surface_error)?;
        self.history.clear();
        Ok(encoding)
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a change listener; false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Canonical form of the current document
    pub fn content(&self) -> String {
        canonical::encode(self.surface.document())
    }

    /// The current document
    pub fn document(&self) -> &Document {
        self.surface.document()
    }

    /// The current selection
    pub fn selection(&self) -> Selection {
        self.surface.selection()
    }

    /// Plain text covered by the selection
    pub fn selected_text(&self) -> String {
        self.surface.selected_text()
    }

    /// The wrapped surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Active configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Move the selection
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        self.surface.set_selection(selection).map_err(surface_error)?;
        self.emit();
        Ok(())
    }

    /// Type text at the selection
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        self.mutate("insert text", |surface| surface.insert_text(text))
    }

    /// Delete the selection or the character before the caret
    pub fn backspace(&mut self) -> Result<()> {
        self.mutate("backspace", |surface| surface.delete_backward())
    }

    /// Split the current block
    pub fn enter(&mut self) -> Result<()> {
        self.mutate("paragraph", |surface| surface.insert_paragraph())
    }

    /// Insert a hard line break
    pub fn line_break(&mut self) -> Result<()> {
        self.mutate("line break", |surface| surface.insert_line_break())
    }

    /// Toggle bold on the selection
    pub fn toggle_bold(&mut self) -> Result<()> {
        self.toggle_format(TextFormat::BOLD)
    }

    /// Toggle italic on the selection
    pub fn toggle_italic(&mut self) -> Result<()> {
        self.toggle_format(TextFormat::ITALIC)
    }

    /// Toggle underline on the selection
    pub fn toggle_underline(&mut self) -> Result<()> {
        self.toggle_format(TextFormat::UNDERLINE)
    }

    /// Toggle strikethrough on the selection
    pub fn toggle_strikethrough(&mut self) -> Result<()> {
        self.toggle_format(TextFormat::STRIKETHROUGH)
    }

    /// Toggle arbitrary formatting flags on the selection
    pub fn toggle_format(&mut self, format: TextFormat) -> Result<()> {
        self.mutate("toggle format", |surface| surface.toggle_format(format))
    }

    /// Convert the selected blocks to a list, or back to paragraphs
    ///
    /// When every touched block is already an item of `kind` they become
    /// paragraphs; otherwise they all become items of `kind`.
    pub fn toggle_list(&mut self, kind: ListKind) -> Result<()> {
        let document = self.surface.document();
        let all_items = self
            .surface
            .selection()
            .block_range()
            .filter_map(|index| document.blocks.get(index))
            .all(|block| block.kind.is_list_item_of(kind));

        let target = if all_items {
            BlockKind::Paragraph
        } else {
            BlockKind::ListItem(kind)
        };
        self.set_block(target)
    }

    /// Convert the selected blocks to `kind`
    pub fn set_block(&mut self, kind: BlockKind) -> Result<()> {
        self.mutate("set block", |surface| surface.set_block_kind(kind))
    }

    /// Link the selected text, or unlink it with `None`
    pub fn set_link(&mut self, url: Option<&str>) -> Result<()> {
        self.mutate("link", |surface| surface.set_link(url))
    }

    /// Undo the last change; false when there is nothing to undo
    pub fn undo(&mut self) -> Result<bool> {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            debug!("Nothing to undo");
            return Ok(false);
        };
        self.restore(previous)?;
        self.emit();
        Ok(true)
    }

    /// Redo the last undone change; false when there is nothing to redo
    pub fn redo(&mut self) -> Result<bool> {
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            debug!("Nothing to redo");
            return Ok(false);
        };
        self.restore(next)?;
        self.emit();
        Ok(true)
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn mutate<F>(&mut self, command: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut S) -> std::result::Result<(), S::Error>,
    {
        let before = self.snapshot();
        apply(&mut self.surface).map_err(surface_error)?;

        if self.surface.document() != &before.document {
            self.history.record(before);
        }
        debug!("Applied {} at {}", command, self.surface.selection());
        self.emit();
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.surface.document().clone(),
            selection: self.surface.selection(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        self.surface.load(snapshot.document).map_err(surface_error)?;
        self.surface
            .set_selection(snapshot.selection)
            .map_err(surface_error)
    }

    fn emit(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let event = ChangeEvent {
            content: self.content(),
            selected_text: self.surface.selected_text(),
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

fn surface_error<E: fmt::Display>(e: E) -> EditorError {
    EditorError::Surface(e.to_string())
}
