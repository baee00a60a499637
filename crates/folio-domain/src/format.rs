//! Inline formatting flags

use bitflags::bitflags;

bitflags! {
    /// Formatting flags carried by a text run.
    ///
    /// Flags are independent: any combination may be set on one run. The bit
    /// values are the ones used by the `format` field of canonical text nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextFormat: u32 {
        /// Bold weight
        const BOLD = 1;
        /// Italic style
        const ITALIC = 1 << 1;
        /// Line through the text
        const STRIKETHROUGH = 1 << 2;
        /// Underline decoration
        const UNDERLINE = 1 << 3;
        /// Inline code span
        const CODE = 1 << 4;
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        TextFormat::empty()
    }
}

impl TextFormat {
    /// The flags exposed as toolbar toggles
    pub const TOGGLES: [TextFormat; 4] = [
        TextFormat::BOLD,
        TextFormat::ITALIC,
        TextFormat::UNDERLINE,
        TextFormat::STRIKETHROUGH,
    ];

    /// Parse a toggle name as typed in commands ("bold", "strike", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bold" | "b" => Some(TextFormat::BOLD),
            "italic" | "i" => Some(TextFormat::ITALIC),
            "underline" | "u" => Some(TextFormat::UNDERLINE),
            "strikethrough" | "strike" | "s" => Some(TextFormat::STRIKETHROUGH),
            "code" => Some(TextFormat::CODE),
            _ => None,
        }
    }
}
