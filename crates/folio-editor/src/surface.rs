//! In-memory editing surface
//!
//! `MemorySurface` is the built-in rich-text engine: a document, a
//! selection, and the format flags toggled at a collapsed caret. Every
//! mutation re-checks the document invariants and reports a breach as
//! [`SurfaceError::InvariantViolation`].

use crate::error::SurfaceError;
use folio_domain::document::byte_index;
use folio_domain::traits::EditingSurface;
use folio_domain::{Block, BlockKind, Document, Inline, Position, Selection, TextFormat, TextRun};
use tracing::trace;

/// The built-in editing engine
#[derive(Debug, Clone)]
pub struct MemorySurface {
    document: Document,
    selection: Selection,
    pending: TextFormat,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Surface holding one empty paragraph
    pub fn new() -> Self {
        Self {
            document: Document::blank(),
            selection: Selection::default(),
            pending: TextFormat::empty(),
        }
    }

    /// Flags toggled at the caret, applied to the next inserted text
    pub fn pending_format(&self) -> TextFormat {
        self.pending
    }

    fn block(&self, index: usize) -> Result<&Block, SurfaceError> {
        self.document
            .blocks
            .get(index)
            .ok_or_else(|| SurfaceError::InvariantViolation(format!("block {} out of range", index)))
    }

    fn block_mut(&mut self, index: usize) -> Result<&mut Block, SurfaceError> {
        self.document
            .blocks
            .get_mut(index)
            .ok_or_else(|| SurfaceError::InvariantViolation(format!("block {} out of range", index)))
    }

    fn clamp(&self, position: Position) -> Position {
        let last = self.document.blocks.len().saturating_sub(1);
        let block = position.block.min(last);
        let len = self.document.blocks.get(block).map(Block::char_len).unwrap_or(0);
        Position::new(block, position.offset.min(len))
    }

    fn collapse_to(&mut self, position: Position) {
        self.selection = Selection::caret(position);
    }

    /// Remove the selected range and leave a caret at its start
    fn delete_selection(&mut self) -> Result<Position, SurfaceError> {
        let (start, end) = self.selection.ordered();
        if start == end {
            return Ok(start);
        }

        if start.block == end.block {
            let block = self.block_mut(start.block)?;
            let (head, _) = block.split_children(start.offset);
            let (_, tail) = block.split_children(end.offset);
            block.children = head;
            block.children.extend(tail);
            block.normalize();
        } else {
            let (_, tail) = self.block(end.block)?.split_children(end.offset);
            let first = self.block_mut(start.block)?;
            let (head, _) = first.split_children(start.offset);
            first.children = head;
            first.children.extend(tail);
            first.normalize();
            self.document.blocks.drain(start.block + 1..=end.block);
        }

        self.collapse_to(start);
        Ok(start)
    }

    /// Format and link of the text a caret at `position` continues
    fn style_at(&self, position: Position) -> (TextFormat, Option<String>) {
        let Some(block) = self.document.blocks.get(position.block) else {
            return (TextFormat::empty(), None);
        };
        let (head, tail) = block.split_children(position.offset);
        head.iter()
            .rev()
            .chain(tail.iter())
            .find_map(Inline::as_run)
            .map(|run| (run.format, run.link.clone()))
            .unwrap_or_default()
    }

    /// Apply `f` to every text run inside the selection
    fn map_selected_runs(&mut self, mut f: impl FnMut(&mut TextRun)) -> Result<(), SurfaceError> {
        let (start, end) = self.selection.ordered();
        for index in start.block..=end.block {
            let block = self.block_mut(index)?;
            let from = if index == start.block { start.offset } else { 0 };
            let to = if index == end.block {
                end.offset
            } else {
                block.char_len()
            };

            let (head, tail) = block.split_children(to);
            let (left, mut middle) = Block {
                kind: block.kind,
                children: head,
            }
            .split_children(from);
            for inline in &mut middle {
                if let Inline::Text(run) = inline {
                    f(run);
                }
            }

            block.children = left;
            block.children.extend(middle);
            block.children.extend(tail);
            block.normalize();
        }
        Ok(())
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.document.blocks.is_empty() {
            return Err(SurfaceError::InvariantViolation(
                "document has no blocks".to_string(),
            ));
        }
        self.document
            .validate()
            .map_err(SurfaceError::InvariantViolation)?;
        for position in [self.selection.anchor, self.selection.focus] {
            if self.clamp(position) != position {
                return Err(SurfaceError::InvariantViolation(format!(
                    "selection {} outside the document",
                    position
                )));
            }
        }
        Ok(())
    }
}

impl EditingSurface for MemorySurface {
    type Error = SurfaceError;

    fn load(&mut self, document: Document) -> Result<(), SurfaceError> {
        document.validate().map_err(SurfaceError::InvalidDocument)?;
        self.document = if document.blocks.is_empty() {
            Document::blank()
        } else {
            document
        };
        self.selection = Selection::default();
        self.pending = TextFormat::empty();
        trace!("Loaded {} blocks", self.document.block_count());
        Ok(())
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) -> Result<(), SurfaceError> {
        let clamped = Selection::range(self.clamp(selection.anchor), self.clamp(selection.focus));
        if clamped != self.selection {
            self.pending = TextFormat::empty();
        }
        self.selection = clamped;
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        if text.is_empty() {
            return Ok(());
        }
        let at = self.delete_selection()?;
        let (format, link) = self.style_at(at);
        let format = format.symmetric_difference(self.pending);
        self.pending = TextFormat::empty();

        let mut inserted = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                inserted.push(Inline::LineBreak);
            }
            if !line.is_empty() {
                inserted.push(Inline::Text(TextRun {
                    text: line.to_string(),
                    format,
                    link: link.clone(),
                }));
            }
        }
        let len: usize = inserted.iter().map(Inline::char_len).sum();

        let block = self.block_mut(at.block)?;
        let (mut children, tail) = block.split_children(at.offset);
        children.extend(inserted);
        children.extend(tail);
        block.children = children;
        block.normalize();

        self.collapse_to(Position::new(at.block, at.offset + len));
        self.check()
    }

    fn delete_backward(&mut self) -> Result<(), SurfaceError> {
        self.pending = TextFormat::empty();
        if !self.selection.is_collapsed() {
            self.delete_selection()?;
            return self.check();
        }

        let caret = self.clamp(self.selection.focus);
        if caret.offset > 0 {
            self.selection = Selection::range(Position::new(caret.block, caret.offset - 1), caret);
            self.delete_selection()?;
        } else if caret.block > 0 {
            // Merge into the previous block
            let previous_len = self.block(caret.block - 1)?.char_len();
            self.selection = Selection::range(Position::new(caret.block - 1, previous_len), caret);
            self.delete_selection()?;
        } else {
            let block = self.block_mut(0)?;
            block.kind = BlockKind::Paragraph;
        }
        self.check()
    }

    fn insert_paragraph(&mut self) -> Result<(), SurfaceError> {
        let at = self.delete_selection()?;
        self.pending = TextFormat::empty();

        let block = self.block(at.block)?;
        let kind = block.kind;
        let empty = block.is_empty();
        let (head, tail) = block.split_children(at.offset);

        if matches!(kind, BlockKind::ListItem(_)) && empty {
            // Enter on an empty item leaves the list
            self.block_mut(at.block)?.kind = BlockKind::Paragraph;
            return self.check();
        }

        let next_kind = match kind {
            BlockKind::Heading(_) | BlockKind::Quote if tail.is_empty() => BlockKind::Paragraph,
            other => other,
        };

        let current = self.block_mut(at.block)?;
        current.children = head;
        current.normalize();
        let mut next = Block {
            kind: next_kind,
            children: tail,
        };
        next.normalize();
        self.document.blocks.insert(at.block + 1, next);

        self.collapse_to(Position::new(at.block + 1, 0));
        self.check()
    }

    fn insert_line_break(&mut self) -> Result<(), SurfaceError> {
        let at = self.delete_selection()?;
        let block = self.block_mut(at.block)?;
        let (mut children, tail) = block.split_children(at.offset);
        children.push(Inline::LineBreak);
        children.extend(tail);
        block.children = children;
        block.normalize();

        self.collapse_to(Position::new(at.block, at.offset + 1));
        self.check()
    }

    fn toggle_format(&mut self, format: TextFormat) -> Result<(), SurfaceError> {
        if self.selection.is_collapsed() {
            self.pending.toggle(format);
            trace!("Pending format at caret: {:?}", self.pending);
            return Ok(());
        }
        self.map_selected_runs(|run| run.format.toggle(format))?;
        self.check()
    }

    fn set_block_kind(&mut self, kind: BlockKind) -> Result<(), SurfaceError> {
        if let BlockKind::Heading(level) = kind {
            if !(1..=6).contains(&level) {
                return Err(SurfaceError::InvalidCommand(format!(
                    "heading level {} out of range [1, 6]",
                    level
                )));
            }
        }
        for index in self.selection.block_range() {
            self.block_mut(index)?.kind = kind;
        }
        self.check()
    }

    fn set_link(&mut self, url: Option<&str>) -> Result<(), SurfaceError> {
        if self.selection.is_collapsed() {
            return Ok(());
        }
        let url = url.map(str::trim).filter(|url| !url.is_empty()).map(str::to_string);
        self.map_selected_runs(|run| run.link = url.clone())?;
        self.check()
    }

    fn selected_text(&self) -> String {
        let (start, end) = self.selection.ordered();
        (start.block..=end.block)
            .filter_map(|index| self.document.blocks.get(index).map(|block| (index, block)))
            .map(|(index, block)| {
                let text = block.text();
                let from = if index == start.block { start.offset } else { 0 };
                let to = if index == end.block { end.offset } else { usize::MAX };
                let from = byte_index(&text, from);
                let to = byte_index(&text, to).max(from);
                text[from..to].to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::ListKind;

    fn surface_with(blocks: Vec<Block>) -> MemorySurface {
        let mut surface = MemorySurface::new();
        surface.load(Document::new(blocks)).unwrap();
        surface
    }

    fn select(surface: &mut MemorySurface, a: (usize, usize), f: (usize, usize)) {
        surface
            .set_selection(Selection::range(Position::new(a.0, a.1), Position::new(f.0, f.1)))
            .unwrap();
    }

    #[test]
    fn test_new_surface_is_blank() {
        let surface = MemorySurface::new();
        assert_eq!(surface.document(), &Document::blank());
        assert!(surface.selection().is_collapsed());
    }

    #[test]
    fn test_load_rejects_invalid_document() {
        let mut surface = MemorySurface::new();
        let bad = Document::new(vec![Block::new(BlockKind::Heading(9))]);
        assert!(matches!(surface.load(bad), Err(SurfaceError::InvalidDocument(_))));
    }

    #[test]
    fn test_load_of_empty_document_gives_blank() {
        let surface = surface_with(vec![]);
        assert_eq!(surface.document().block_count(), 1);
    }

    #[test]
    fn test_insert_text_moves_caret() {
        let mut surface = MemorySurface::new();
        surface.insert_text("Hello").unwrap();
        surface.insert_text(" world").unwrap();
        assert_eq!(surface.document().plain_text("\n"), "Hello world");
        assert_eq!(surface.selection().focus, Position::new(0, 11));
        // Same style, so the runs merged
        assert_eq!(surface.document().blocks[0].children.len(), 1);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("Hello world")])]);
        select(&mut surface, (0, 6), (0, 11));
        surface.insert_text("there").unwrap();
        assert_eq!(surface.document().plain_text("\n"), "Hello there");
    }

    #[test]
    fn test_insert_text_with_newline_adds_line_break() {
        let mut surface = MemorySurface::new();
        surface.insert_text("a\nb").unwrap();
        let block = &surface.document().blocks[0];
        assert_eq!(block.children[1], Inline::LineBreak);
        assert_eq!(block.text(), "a\nb");
    }

    #[test]
    fn test_toggle_on_range_is_involutive() {
        let original = vec![Block::paragraph(vec![
            TextRun::plain("plain "),
            TextRun::formatted("bold", TextFormat::BOLD),
        ])];
        let mut surface = surface_with(original.clone());
        select(&mut surface, (0, 3), (0, 8));

        surface.toggle_format(TextFormat::BOLD).unwrap();
        let formats: Vec<_> = surface.document().blocks[0]
            .char_formats()
            .into_iter()
            .map(|(_, f)| f.contains(TextFormat::BOLD))
            .collect();
        assert_eq!(
            formats,
            vec![false, false, false, true, true, true, false, false, true, true]
        );

        surface.toggle_format(TextFormat::BOLD).unwrap();
        assert_eq!(surface.document().blocks, original);
    }

    #[test]
    fn test_toggle_at_caret_sets_pending_format() {
        let mut surface = MemorySurface::new();
        surface.insert_text("a").unwrap();
        surface.toggle_format(TextFormat::ITALIC).unwrap();
        assert_eq!(surface.pending_format(), TextFormat::ITALIC);

        surface.insert_text("b").unwrap();
        let runs: Vec<_> = surface.document().blocks[0]
            .children
            .iter()
            .filter_map(Inline::as_run)
            .collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].format, TextFormat::ITALIC);
        assert!(surface.pending_format().is_empty());

        // Typing continues in the caret's format
        surface.insert_text("c").unwrap();
        assert_eq!(surface.document().blocks[0].children.len(), 2);
    }

    #[test]
    fn test_moving_caret_drops_pending_format() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("abc")])]);
        surface.toggle_format(TextFormat::BOLD).unwrap();
        select(&mut surface, (0, 2), (0, 2));
        assert!(surface.pending_format().is_empty());
    }

    #[test]
    fn test_toggle_across_blocks() {
        let mut surface = surface_with(vec![
            Block::paragraph(vec![TextRun::plain("one")]),
            Block::paragraph(vec![TextRun::plain("two")]),
        ]);
        select(&mut surface, (0, 1), (1, 2));
        surface.toggle_format(TextFormat::UNDERLINE).unwrap();
        assert_eq!(surface.selected_text(), "ne\ntw");

        let first = &surface.document().blocks[0];
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[1].as_run().unwrap().format, TextFormat::UNDERLINE);
        let second = &surface.document().blocks[1];
        assert_eq!(second.children[0].as_run().unwrap().text, "tw");
    }

    #[test]
    fn test_backward_selection_is_handled() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("abcdef")])]);
        select(&mut surface, (0, 4), (0, 1));
        assert_eq!(surface.selected_text(), "bcd");
        surface.delete_backward().unwrap();
        assert_eq!(surface.document().plain_text(""), "aef");
        assert_eq!(surface.selection().focus, Position::new(0, 1));
    }

    #[test]
    fn test_delete_backward_merges_blocks() {
        let mut surface = surface_with(vec![
            Block::paragraph(vec![TextRun::plain("one")]),
            Block::paragraph(vec![TextRun::formatted("two", TextFormat::BOLD)]),
        ]);
        select(&mut surface, (1, 0), (1, 0));
        surface.delete_backward().unwrap();
        assert_eq!(surface.document().block_count(), 1);
        assert_eq!(surface.document().blocks[0].text(), "onetwo");
        assert_eq!(surface.selection().focus, Position::new(0, 3));
    }

    #[test]
    fn test_delete_backward_at_start_resets_block_kind() {
        let mut surface = surface_with(vec![Block::with_runs(
            BlockKind::ListItem(ListKind::Bullet),
            vec![TextRun::plain("item")],
        )]);
        surface.delete_backward().unwrap();
        assert_eq!(surface.document().blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(surface.document().blocks[0].text(), "item");
    }

    #[test]
    fn test_delete_range_across_blocks() {
        let mut surface = surface_with(vec![
            Block::paragraph(vec![TextRun::plain("first")]),
            Block::paragraph(vec![TextRun::plain("middle")]),
            Block::paragraph(vec![TextRun::plain("last")]),
        ]);
        select(&mut surface, (0, 2), (2, 1));
        surface.delete_backward().unwrap();
        assert_eq!(surface.document().block_count(), 1);
        assert_eq!(surface.document().blocks[0].text(), "fiast");
    }

    #[test]
    fn test_insert_paragraph_splits_block() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("headtail")])]);
        select(&mut surface, (0, 4), (0, 4));
        surface.insert_paragraph().unwrap();
        assert_eq!(surface.document().plain_text("|"), "head|tail");
        assert_eq!(surface.selection().focus, Position::new(1, 0));
    }

    #[test]
    fn test_insert_paragraph_after_heading() {
        let mut surface = surface_with(vec![Block::with_runs(
            BlockKind::Heading(2),
            vec![TextRun::plain("Title")],
        )]);
        select(&mut surface, (0, 5), (0, 5));
        surface.insert_paragraph().unwrap();
        assert_eq!(surface.document().blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_insert_paragraph_continues_and_leaves_list() {
        let item = BlockKind::ListItem(ListKind::Number);
        let mut surface = surface_with(vec![Block::with_runs(item, vec![TextRun::plain("one")])]);
        select(&mut surface, (0, 3), (0, 3));

        surface.insert_paragraph().unwrap();
        assert_eq!(surface.document().blocks[1].kind, item);

        surface.insert_paragraph().unwrap();
        assert_eq!(surface.document().block_count(), 2);
        assert_eq!(surface.document().blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_insert_line_break() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("ab")])]);
        select(&mut surface, (0, 1), (0, 1));
        surface.insert_line_break().unwrap();
        assert_eq!(surface.document().blocks[0].text(), "a\nb");
        assert_eq!(surface.selection().focus, Position::new(0, 2));
    }

    #[test]
    fn test_set_block_kind_rejects_bad_heading() {
        let mut surface = MemorySurface::new();
        assert!(matches!(
            surface.set_block_kind(BlockKind::Heading(0)),
            Err(SurfaceError::InvalidCommand(_))
        ));
        surface.set_block_kind(BlockKind::Heading(3)).unwrap();
        assert_eq!(surface.document().blocks[0].kind, BlockKind::Heading(3));
    }

    #[test]
    fn test_set_and_clear_link() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("go here")])]);
        select(&mut surface, (0, 3), (0, 7));
        surface.set_link(Some("https://example.com")).unwrap();
        let runs: Vec<_> = surface.document().blocks[0]
            .children
            .iter()
            .filter_map(Inline::as_run)
            .collect();
        assert_eq!(runs[1].link.as_deref(), Some("https://example.com"));
        assert_eq!(runs[1].text, "here");

        surface.set_link(Some("   ")).unwrap();
        assert_eq!(surface.document().blocks[0].children.len(), 1);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("abc")])]);
        select(&mut surface, (0, 1), (5, 50));
        assert_eq!(surface.selection().focus, Position::new(0, 3));
        assert_eq!(surface.selected_text(), "bc");
    }

    #[test]
    fn test_multibyte_text() {
        let mut surface = surface_with(vec![Block::paragraph(vec![TextRun::plain("héllo wörld")])]);
        select(&mut surface, (0, 6), (0, 11));
        assert_eq!(surface.selected_text(), "wörld");
        surface.toggle_format(TextFormat::BOLD).unwrap();
        assert_eq!(surface.document().blocks[0].text(), "héllo wörld");
    }
}
