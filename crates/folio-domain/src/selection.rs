//! Selection module - caret and range positions inside a document

use std::fmt;

/// A point in the document: block index plus character offset in that block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Index into `Document::blocks`
    pub block: usize,

    /// Character offset within the block's text
    pub offset: usize,
}

impl Position {
    /// Create a position
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// A selection; collapsed when anchor and focus coincide
///
/// The anchor is where the selection started and the focus where it ends,
/// so the focus may come before the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,

    /// Where the selection ends (the caret)
    pub focus: Position,
}

impl Selection {
    /// Collapsed selection at one position
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    /// Range selection
    pub fn range(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Whether the selection is a bare caret
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Start and end in document order
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    /// Indices of the blocks the selection touches
    pub fn block_range(&self) -> std::ops::RangeInclusive<usize> {
        let (start, end) = self.ordered();
        start.block..=end.block
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.focus)
        } else {
            write!(f, "{}..{}", self.anchor, self.focus)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_order_by_block_then_offset() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(1, 2) < Position::new(1, 3));
    }

    #[test]
    fn test_backward_selection_is_ordered() {
        let sel = Selection::range(Position::new(2, 1), Position::new(0, 4));
        let (start, end) = sel.ordered();
        assert_eq!(start, Position::new(0, 4));
        assert_eq!(end, Position::new(2, 1));
        assert_eq!(sel.block_range(), 0..=2);
    }

    #[test]
    fn test_caret_is_collapsed() {
        let sel = Selection::caret(Position::new(1, 1));
        assert!(sel.is_collapsed());
        assert_eq!(sel.to_string(), "1:1");
    }
}
