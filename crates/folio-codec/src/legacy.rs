//! Legacy form: translate raw markup into blocks and inline runs
//!
//! Older articles were stored as HTML. The translation is tolerant: the
//! markup parser never fails, unknown elements are treated as transparent
//! inline wrappers, and anything that cannot be read as a tag stays text.

use crate::markup::{self, MarkupEngine};
use folio_domain::{Block, Document, TextRun};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Tags that end a line of text in the regex translation
static BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|blockquote|pre|tr|section|article)\s*>")
        .expect("break pattern is valid")
});

/// Translate markup into a document
///
/// The result may hold no blocks (empty or whitespace-only markup); callers
/// that need an editable document substitute `Document::blank()`.
pub fn translate(content: &str, engine: MarkupEngine) -> Document {
    let document = match engine.effective() {
        MarkupEngine::Dom => dom::translate(content),
        MarkupEngine::Regex => translate_with_regex(content),
    };
    debug!(
        "Translated {} bytes of legacy markup into {} blocks",
        content.len(),
        document.block_count()
    );
    document
}

/// Lower-fidelity translation: one paragraph per line of text
///
/// Structure and formatting are lost; entities stay as written.
pub fn translate_with_regex(content: &str) -> Document {
    let with_breaks = BREAK_PATTERN.replace_all(content, "\n");
    let text = markup::strip_tags(&with_breaks);
    let blocks = text
        .lines()
        .map(|line| markup::collapse_whitespace(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .map(|line| Block::paragraph(vec![TextRun::plain(line)]))
        .collect();
    Document::new(blocks)
}

#[cfg(feature = "dom")]
mod dom {
    use crate::markup::collapse_whitespace;
    use folio_domain::{Block, BlockKind, Document, Inline, ListKind, TextFormat, TextRun};
    use scraper::{ElementRef, Html, Node};

    pub(super) fn translate(content: &str) -> Document {
        let fragment = Html::parse_fragment(content);
        let mut builder = BlockBuilder::default();
        builder.walk(fragment.root_element(), &Style::default());
        builder.finish()
    }

    #[derive(Debug, Clone, Default)]
    struct Style {
        format: TextFormat,
        link: Option<String>,
        preformatted: bool,
    }

    #[derive(Default)]
    struct BlockBuilder {
        blocks: Vec<Block>,
        open: Option<Block>,
        /// Quote and list-item blocks currently being walked, innermost last
        containers: Vec<BlockKind>,
    }

    impl BlockBuilder {
        fn walk(&mut self, element: ElementRef<'_>, style: &Style) {
            for child in element.children() {
                match child.value() {
                    Node::Text(text) => self.push_text(text, style),
                    Node::Element(_) => {
                        if let Some(child) = ElementRef::wrap(child) {
                            self.visit(child, style);
                        }
                    }
                    _ => {}
                }
            }
        }

        fn visit(&mut self, element: ElementRef<'_>, style: &Style) {
            let name = element.value().name();
            match name {
                "p" => self.block(BlockKind::Paragraph, element, style),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let level = name[1..].parse().unwrap_or(1);
                    self.block(BlockKind::Heading(level), element, style);
                }
                "blockquote" => self.block(BlockKind::Quote, element, style),
                "pre" => {
                    let style = Style {
                        preformatted: true,
                        ..style.clone()
                    };
                    self.block(BlockKind::Code, element, &style);
                }
                "ul" | "ol" => {
                    let kind = ListKind::parse(name).unwrap_or(ListKind::Bullet);
                    self.interrupt();
                    for item in element.children().filter_map(ElementRef::wrap) {
                        if item.value().name() == "li" {
                            self.block(BlockKind::ListItem(kind), item, style);
                        } else {
                            self.visit(item, style);
                        }
                    }
                    self.interrupt();
                }
                "li" => self.block(BlockKind::ListItem(ListKind::Bullet), element, style),
                "div" | "section" | "article" | "main" | "header" | "footer" | "aside"
                | "nav" | "figure" | "figcaption" | "body" | "html" | "table" | "tbody"
                | "thead" | "tr" | "td" | "th" => {
                    if self.containers.is_empty() {
                        self.interrupt();
                        self.walk(element, style);
                        self.interrupt();
                    } else {
                        self.continue_container(element, style);
                    }
                }
                "hr" => self.interrupt(),
                "br" => self.open_block().children.push(Inline::LineBreak),
                "script" | "style" | "head" | "title" | "template" | "img" | "iframe" => {}
                "b" | "strong" => self.walk(element, &style.with(TextFormat::BOLD)),
                "i" | "em" => self.walk(element, &style.with(TextFormat::ITALIC)),
                "u" | "ins" => self.walk(element, &style.with(TextFormat::UNDERLINE)),
                "s" | "strike" | "del" => self.walk(element, &style.with(TextFormat::STRIKETHROUGH)),
                "code" | "kbd" | "samp" if !style.preformatted => {
                    self.walk(element, &style.with(TextFormat::CODE))
                }
                "a" => {
                    let href = element
                        .value()
                        .attr("href")
                        .map(str::trim)
                        .filter(|href| !href.is_empty());
                    match href {
                        Some(href) => {
                            let style = Style {
                                link: Some(href.to_string()),
                                ..style.clone()
                            };
                            self.walk(element, &style);
                        }
                        None => self.walk(element, style),
                    }
                }
                // span, font, mark, and anything unknown: transparent
                _ => self.walk(element, style),
            }
        }

        fn block(&mut self, kind: BlockKind, element: ElementRef<'_>, style: &Style) {
            let in_container = !self.containers.is_empty();
            if in_container && matches!(kind, BlockKind::Paragraph | BlockKind::Heading(_)) {
                self.continue_container(element, style);
                return;
            }

            self.interrupt();
            self.open = Some(Block::new(kind));
            let container = matches!(kind, BlockKind::Quote | BlockKind::ListItem(_));
            if container {
                self.containers.push(kind);
            }
            self.walk(element, style);
            if container {
                self.containers.pop();
            }
            self.close();
        }

        /// Paragraph-level content inside a quote or list item: later
        /// paragraphs continue the same block after a line break
        fn continue_container(&mut self, element: ElementRef<'_>, style: &Style) {
            if let Some(block) = self.open.as_mut() {
                trim_trailing_space(block);
                if !block.children.is_empty() {
                    block.children.push(Inline::LineBreak);
                }
            }
            self.walk(element, style);
        }

        fn open_block(&mut self) -> &mut Block {
            let kind = self.containers.last().copied().unwrap_or(BlockKind::Paragraph);
            self.open.get_or_insert_with(|| Block::new(kind))
        }

        fn push_text(&mut self, raw: &str, style: &Style) {
            let mut text = if style.preformatted {
                raw.to_string()
            } else {
                collapse_whitespace(raw)
            };

            if !style.preformatted {
                // Whitespace between blocks does not open a paragraph
                if self.open.is_none() && text.trim().is_empty() {
                    return;
                }
                let at_line_start = self
                    .open
                    .as_ref()
                    .map(|block| {
                        let current = block.text();
                        current.is_empty() || current.ends_with(' ') || current.ends_with('\n')
                    })
                    .unwrap_or(true);
                if at_line_start {
                    text = text.trim_start().to_string();
                }
            }
            if text.is_empty() {
                return;
            }

            let run = TextRun {
                text,
                format: style.format,
                link: style.link.clone(),
            };
            self.open_block().children.push(Inline::Text(run));
        }

        fn close(&mut self) {
            if let Some(mut block) = self.open.take() {
                if block.kind != BlockKind::Code {
                    trim_trailing_space(&mut block);
                }
                block.normalize();
                self.blocks.push(block);
            }
        }

        /// Close the open block because a nested block starts or ends here
        ///
        /// A quote or list item that is still empty only wrapped the nested
        /// block, so it is dropped instead of emitted.
        fn interrupt(&mut self) {
            let wrapper_only = self.open.as_ref().is_some_and(|block| {
                matches!(block.kind, BlockKind::Quote | BlockKind::ListItem(_))
                    && block.children.iter().all(|inline| inline.text().trim().is_empty())
            });
            if wrapper_only && !self.containers.is_empty() {
                self.open = None;
            } else {
                self.close();
            }
        }

        fn finish(mut self) -> Document {
            self.close();
            Document::new(self.blocks)
        }
    }

    impl Style {
        fn with(&self, flag: TextFormat) -> Style {
            Style {
                format: self.format | flag,
                ..self.clone()
            }
        }
    }

    fn trim_trailing_space(block: &mut Block) {
        while let Some(Inline::Text(run)) = block.children.last_mut() {
            let trimmed = run.text.trim_end().len();
            run.text.truncate(trimmed);
            if !run.text.is_empty() {
                break;
            }
            block.children.pop();
        }
    }
}

#[cfg(not(feature = "dom"))]
mod dom {
    use folio_domain::Document;

    pub(super) fn translate(content: &str) -> Document {
        super::translate_with_regex(content)
    }
}
