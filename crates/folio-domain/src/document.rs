//! Document module - the in-memory article body
//!
//! A document is a flat, ordered list of blocks. Each block holds inline
//! nodes; there is no nesting beyond block → inline. Lists are flat too:
//! every list item is its own block and consecutive items of the same kind
//! form one list when serialized.

use crate::format::TextFormat;

/// Kind of list a list-item block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Unordered list (`ul`)
    Bullet,
    /// Ordered list (`ol`)
    Number,
}

impl ListKind {
    /// Name used for the `listType` field of canonical list nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Bullet => "bullet",
            ListKind::Number => "number",
        }
    }

    /// Markup tag of the list container
    pub fn tag(&self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Number => "ol",
        }
    }

    /// Parse from a `listType` value or a markup tag
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bullet" | "ul" | "check" => Some(ListKind::Bullet),
            "number" | "ol" => Some(ListKind::Number),
            _ => None,
        }
    }
}

/// Kind of a block node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Plain paragraph
    Paragraph,
    /// Heading; the level must be in `1..=6`
    Heading(u8),
    /// Block quote
    Quote,
    /// Preformatted code block
    Code,
    /// One item of a list
    ListItem(ListKind),
}

impl BlockKind {
    /// Short human-readable name
    pub fn name(&self) -> String {
        match self {
            BlockKind::Paragraph => "paragraph".to_string(),
            BlockKind::Heading(level) => format!("h{}", level),
            BlockKind::Quote => "quote".to_string(),
            BlockKind::Code => "code".to_string(),
            BlockKind::ListItem(kind) => format!("{}-item", kind.as_str()),
        }
    }

    /// Whether this block is an item of the given list kind
    pub fn is_list_item_of(&self, kind: ListKind) -> bool {
        matches!(self, BlockKind::ListItem(k) if *k == kind)
    }
}

/// A run of text sharing one set of formatting flags and one link target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    /// Text payload
    pub text: String,

    /// Formatting flags
    pub format: TextFormat,

    /// Link target, when the run is part of a link
    pub link: Option<String>,
}

impl TextRun {
    /// Unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::empty(),
            link: None,
        }
    }

    /// Run with the given flags
    pub fn formatted(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
            link: None,
        }
    }

    /// Builder-style link target
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Whether two runs can merge into one without losing information
    pub fn same_style(&self, other: &TextRun) -> bool {
        self.format == other.format && self.link == other.link
    }
}

/// Inline node inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Formatted text
    Text(TextRun),
    /// Hard line break within a block
    LineBreak,
}

impl Inline {
    /// Text payload; a line break reads as `\n`
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(run) => &run.text,
            Inline::LineBreak => "\n",
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        match self {
            Inline::Text(run) => run.text.chars().count(),
            Inline::LineBreak => 1,
        }
    }

    /// The text run, if this node is one
    pub fn as_run(&self) -> Option<&TextRun> {
        match self {
            Inline::Text(run) => Some(run),
            Inline::LineBreak => None,
        }
    }
}

impl From<TextRun> for Inline {
    fn from(run: TextRun) -> Self {
        Inline::Text(run)
    }
}

/// A block node: a kind plus its ordered inline children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block kind
    pub kind: BlockKind,

    /// Inline children in document order
    pub children: Vec<Inline>,
}

impl Block {
    /// Empty block of the given kind
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Paragraph holding the given runs
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Self::with_runs(BlockKind::Paragraph, runs)
    }

    /// Block of any kind holding the given runs
    pub fn with_runs(kind: BlockKind, runs: Vec<TextRun>) -> Self {
        Self {
            kind,
            children: runs.into_iter().map(Inline::Text).collect(),
        }
    }

    /// Concatenated text of all inline children
    pub fn text(&self) -> String {
        self.children.iter().map(Inline::text).collect()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.children.iter().map(Inline::char_len).sum()
    }

    /// True when the block has no text at all
    pub fn is_empty(&self) -> bool {
        self.char_len() == 0
    }

    /// Drop empty runs and merge neighbouring runs with the same style
    pub fn normalize(&mut self) {
        let mut merged: Vec<Inline> = Vec::with_capacity(self.children.len());
        for inline in self.children.drain(..) {
            match inline {
                Inline::Text(run) if run.text.is_empty() => {}
                Inline::Text(run) => match merged.last_mut() {
                    Some(Inline::Text(prev)) if prev.same_style(&run) => {
                        prev.text.push_str(&run.text);
                    }
                    _ => merged.push(Inline::Text(run)),
                },
                Inline::LineBreak => merged.push(Inline::LineBreak),
            }
        }
        self.children = merged;
    }

    /// Split the inline children at a character offset
    ///
    /// Offsets past the end split at the end. A run straddling the offset is
    /// cut in two, both halves keeping its style.
    pub fn split_children(&self, offset: usize) -> (Vec<Inline>, Vec<Inline>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut consumed = 0;

        for inline in &self.children {
            let len = inline.char_len();
            if consumed + len <= offset {
                left.push(inline.clone());
            } else if consumed >= offset {
                right.push(inline.clone());
            } else if let Inline::Text(run) = inline {
                let at = byte_index(&run.text, offset - consumed);
                let (head, tail) = run.text.split_at(at);
                left.push(Inline::Text(TextRun {
                    text: head.to_string(),
                    ..run.clone()
                }));
                right.push(Inline::Text(TextRun {
                    text: tail.to_string(),
                    ..run.clone()
                }));
            }
            consumed += len;
        }

        (left, right)
    }

    /// Per-character formatting, line breaks excluded
    pub fn char_formats(&self) -> Vec<(char, TextFormat)> {
        self.children
            .iter()
            .filter_map(Inline::as_run)
            .flat_map(|run| run.text.chars().map(move |c| (c, run.format)))
            .collect()
    }
}

/// Byte index of the `chars`-th character (or the end of the string)
pub fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// An article body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Document with the given blocks
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The state of a freshly opened editor: one empty paragraph
    pub fn blank() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Paragraph)],
        }
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True when no block holds any text
    pub fn is_blank(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }

    /// Text of every block joined with `separator`
    pub fn plain_text(&self, separator: &str) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Check structural invariants
    ///
    /// An editing surface refuses documents that fail this check.
    pub fn validate(&self) -> Result<(), String> {
        for (idx, block) in self.blocks.iter().enumerate() {
            if let BlockKind::Heading(level) = block.kind {
                if !(1..=6).contains(&level) {
                    return Err(format!("block {}: heading level {} out of range [1, 6]", idx, level));
                }
            }
            for inline in &block.children {
                if let Inline::Text(TextRun { link: Some(url), .. }) = inline {
                    if url.trim().is_empty() {
                        return Err(format!("block {}: link with empty target", idx));
                    }
                }
            }
        }
        Ok(())
    }
}
