//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use folio_codec::{Encoding, RenderMode};
use folio_domain::{Block, Document, Inline, TextFormat};
use folio_extractor::Summary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of block text shown in a table cell
const CELL_TEXT_LENGTH: usize = 40;

/// What `detect` found out about a Document string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Encoding the string classified as
    pub encoding: Encoding,
    /// How a detail page would display it
    pub render_mode: RenderMode,
    /// Blocks after loading
    pub blocks: usize,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extracted summary.
    pub fn format_summary(&self, summary: &Summary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(summary.text.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Summary", "Truncated", "Path"]);
                builder.push_record([
                    summary.text.as_str(),
                    if summary.truncated { "yes" } else { "no" },
                    summary.path.as_str(),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format an encoding detection report.
    pub fn format_detection(&self, detection: &Detection) -> Result<String> {
        let render = render_mode_name(detection.render_mode);
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "encoding": detection.encoding.as_str(),
                    "render_mode": render,
                    "blocks": detection.blocks,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(detection.encoding.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Encoding", "Renders as", "Blocks"]);
                builder.push_record([
                    detection.encoding.as_str().to_string(),
                    render.to_string(),
                    detection.blocks.to_string(),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format the block list of a document.
    pub fn format_blocks(&self, document: &Document) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let blocks: Vec<serde_json::Value> = document
                    .blocks
                    .iter()
                    .enumerate()
                    .map(|(index, block)| {
                        serde_json::json!({
                            "index": index,
                            "kind": block.kind.name(),
                            "chars": block.char_len(),
                            "formats": format_names(block_formats(block)),
                            "links": block_links(block),
                            "text": block.text(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&blocks)?)
            }
            OutputFormat::Quiet => Ok(document
                .blocks
                .iter()
                .map(|b| b.kind.name())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if document.blocks.is_empty() {
                    return Ok(self.colorize("No blocks.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Kind", "Chars", "Formats", "Links", "Text"]);
                for (index, block) in document.blocks.iter().enumerate() {
                    builder.push_record([
                        index.to_string(),
                        block.kind.name(),
                        block.char_len().to_string(),
                        format_names(block_formats(block)).join(","),
                        block_links(block).len().to_string(),
                        cell_text(&block.text()),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render_mode_name(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Markup => "markup",
        RenderMode::PlainText => "plain-text",
    }
}

/// Union of the formats used anywhere in a block.
fn block_formats(block: &Block) -> TextFormat {
    block
        .children
        .iter()
        .filter_map(Inline::as_run)
        .fold(TextFormat::empty(), |acc, run| acc | run.format)
}

fn block_links(block: &Block) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for link in block.children.iter().filter_map(Inline::as_run).filter_map(|r| r.link.clone()) {
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

/// Lowercase flag names, e.g. `["bold", "italic"]`.
pub fn format_names(format: TextFormat) -> Vec<String> {
    format.iter_names().map(|(name, _)| name.to_lowercase()).collect()
}

fn cell_text(text: &str) -> String {
    let flat = text.replace('\n', "⏎");
    match flat.char_indices().nth(CELL_TEXT_LENGTH) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{BlockKind, ListKind, TextRun};
    use folio_extractor::ExtractionPath;

    fn sample_document() -> Document {
        Document::new(vec![
            Block::with_runs(BlockKind::Heading(1), vec![TextRun::plain("Title")]),
            Block::paragraph(vec![
                TextRun::formatted("bold", TextFormat::BOLD),
                TextRun::plain(" and "),
                TextRun::plain("link").with_link("https://example.com"),
            ]),
            Block::with_runs(BlockKind::ListItem(ListKind::Bullet), vec![TextRun::plain("item")]),
        ])
    }

    #[test]
    fn test_summary_formats() {
        let summary = Summary {
            text: "Hello world".to_string(),
            truncated: false,
            path: ExtractionPath::Canonical,
        };

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_summary(&summary).unwrap(), "Hello world");

        let json = Formatter::new(OutputFormat::Json, false);
        let output = json.format_summary(&summary).unwrap();
        assert!(output.contains("\"path\": \"canonical\""));

        let table = Formatter::new(OutputFormat::Table, false);
        let output = table.format_summary(&summary).unwrap();
        assert!(output.contains("Hello world"));
        assert!(output.contains("Truncated"));
    }

    #[test]
    fn test_detection_formats() {
        let detection = Detection {
            encoding: Encoding::Legacy,
            render_mode: RenderMode::Markup,
            blocks: 2,
        };

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_detection(&detection).unwrap(), "legacy");

        let json = Formatter::new(OutputFormat::Json, false);
        let value: serde_json::Value =
            serde_json::from_str(&json.format_detection(&detection).unwrap()).unwrap();
        assert_eq!(value["render_mode"], "markup");
        assert_eq!(value["blocks"], 2);
    }

    #[test]
    fn test_blocks_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_blocks(&sample_document()).unwrap()).unwrap();
        assert_eq!(value[0]["kind"], "h1");
        assert_eq!(value[1]["formats"][0], "bold");
        assert_eq!(value[1]["links"][0], "https://example.com");
        assert_eq!(value[2]["kind"], "bullet-item");
    }

    #[test]
    fn test_blocks_quiet_and_table() {
        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(
            quiet.format_blocks(&sample_document()).unwrap(),
            "h1\nparagraph\nbullet-item"
        );

        let table = Formatter::new(OutputFormat::Table, false);
        let output = table.format_blocks(&sample_document()).unwrap();
        assert!(output.contains("bold and link"));
        assert_eq!(table.format_blocks(&Document::default()).unwrap(), "No blocks.");
    }

    #[test]
    fn test_cell_text_is_shortened() {
        let long = "x".repeat(50);
        assert_eq!(cell_text(&long).chars().count(), CELL_TEXT_LENGTH + 1);
        assert_eq!(cell_text("a\nb"), "a⏎b");
    }

    #[test]
    fn test_messages_without_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("Saved"), "✓ Saved");
        assert_eq!(formatter.warning("Careful"), "⚠ Careful");
    }
}
