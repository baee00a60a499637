//! Bounded undo/redo history

use folio_domain::{Document, Selection};
use std::collections::VecDeque;

/// Editor state captured before a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Document at capture time
    pub document: Document,
    /// Selection at capture time
    pub selection: Selection,
}

/// Undo and redo stacks with a fixed maximum depth
///
/// Recording a new snapshot drops the redo stack. When the undo stack is
/// full the oldest snapshot is discarded.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    depth: usize,
}

impl History {
    /// Empty history keeping at most `depth` undo steps
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(depth.min(64)),
            redo: Vec::new(),
            depth,
        }
    }

    /// Record the state before a mutation
    pub fn record(&mut self, before: Snapshot) {
        self.redo.clear();
        self.push_undo(before);
    }

    /// Step back: returns the state to restore, saving `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward: returns the state to restore, saving `current` for undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps held
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        if self.depth == 0 {
            return;
        }
        self.undo.push_back(snapshot);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }
}
