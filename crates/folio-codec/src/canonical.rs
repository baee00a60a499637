//! Canonical form: the JSON editor-state tree
//!
//! ```text
//! {"root": {"type": "root", "children": [ <block>, ... ]}}
//! block  = paragraph | heading | quote | code | list
//! list   = {"type": "list", "listType": "bullet"|"number", "children": [ listitem, ... ]}
//! inline = text | linebreak | link
//! ```
//!
//! Encoding is strict and always emits every field. Decoding is lenient:
//! anything with a `root.children` array is canonical, and nodes with
//! missing or unknown fields are read as well as they can be.

use crate::error::CodecError;
use folio_domain::{Block, BlockKind, Document, Inline, ListKind, TextFormat, TextRun};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const NODE_VERSION: u32 = 1;

/// Return the block array of a canonical tree, if the value has that shape
pub fn root_children(value: &Value) -> Option<&Vec<Value>> {
    value.get("root")?.get("children")?.as_array()
}

/// Parse a string and check for the root-with-children shape
pub fn parse_tree(content: &str) -> Result<Value, CodecError> {
    let value: Value = serde_json::from_str(content)?;
    if root_children(&value).is_none() {
        return Err(CodecError::NotCanonical(
            "missing root node with a children array".to_string(),
        ));
    }
    Ok(value)
}

/// Decode a canonical string into a document
pub fn decode(content: &str) -> Result<Document, CodecError> {
    let tree = parse_tree(content)?;
    Ok(decode_tree(&tree))
}

/// Decode an already-parsed canonical tree
///
/// Values without the root shape decode to an empty document.
pub fn decode_tree(tree: &Value) -> Document {
    let mut blocks = Vec::new();
    if let Some(children) = root_children(tree) {
        for node in children {
            decode_block(node, &mut blocks);
        }
    }
    debug!("Decoded canonical tree into {} blocks", blocks.len());
    Document::new(blocks)
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(|v| v.as_str())
}

fn node_children(node: &Value) -> &[Value] {
    node.get("children")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn decode_block(node: &Value, out: &mut Vec<Block>) {
    // A bare text node at block level still carries readable text
    if node.get("text").and_then(|v| v.as_str()).is_some() {
        let mut children = Vec::new();
        decode_inline(node, None, &mut children);
        out.push(Block {
            kind: BlockKind::Paragraph,
            children,
        });
        return;
    }

    let kind = match node_type(node) {
        Some("list") => {
            let list_kind = node
                .get("listType")
                .or_else(|| node.get("tag"))
                .and_then(|v| v.as_str())
                .and_then(ListKind::parse)
                .unwrap_or(ListKind::Bullet);
            for item in node_children(node) {
                decode_list_item(item, list_kind, out);
            }
            return;
        }
        Some("heading") => BlockKind::Heading(heading_level(node)),
        Some("quote") => BlockKind::Quote,
        Some("code") => BlockKind::Code,
        Some("listitem") => {
            decode_list_item(node, ListKind::Bullet, out);
            return;
        }
        _ => BlockKind::Paragraph,
    };

    let mut children = Vec::new();
    for child in node_children(node) {
        decode_inline(child, None, &mut children);
    }
    out.push(Block { kind, children });
}

/// Items flatten into sibling blocks; nested lists follow their parent item
fn decode_list_item(item: &Value, kind: ListKind, out: &mut Vec<Block>) {
    let mut children = Vec::new();
    let mut nested = Vec::new();
    for child in node_children(item) {
        if node_type(child) == Some("list") {
            nested.push(child);
        } else {
            decode_inline(child, None, &mut children);
        }
    }

    // An item that only wraps a nested list has no block of its own
    if !(children.is_empty() && !nested.is_empty()) {
        out.push(Block {
            kind: BlockKind::ListItem(kind),
            children,
        });
    }
    for list in nested {
        decode_block(list, out);
    }
}

fn heading_level(node: &Value) -> u8 {
    node.get("tag")
        .and_then(|v| v.as_str())
        .and_then(|tag| tag.strip_prefix('h'))
        .and_then(|n| n.parse::<u8>().ok())
        .map(|level| level.clamp(1, 6))
        .unwrap_or(1)
}

fn decode_inline(node: &Value, link: Option<&str>, out: &mut Vec<Inline>) {
    match node_type(node) {
        Some("linebreak") => {
            out.push(Inline::LineBreak);
            return;
        }
        Some("link") | Some("autolink") => {
            let url = node
                .get("url")
                .and_then(|v| v.as_str())
                .filter(|u| !u.trim().is_empty())
                .or(link);
            for child in node_children(node) {
                decode_inline(child, url, out);
            }
            return;
        }
        _ => {}
    }

    if let Some(text) = node.get("text").and_then(|v| v.as_str()) {
        let bits = node.get("format").and_then(|v| v.as_u64()).unwrap_or(0);
        out.push(Inline::Text(TextRun {
            text: text.to_string(),
            format: TextFormat::from_bits_truncate(bits as u32),
            link: link.map(str::to_string),
        }));
    } else {
        // Unknown inline container: keep whatever text it wraps
        for child in node_children(node) {
            decode_inline(child, link, out);
        }
    }
}

// --- Encoding ---

#[derive(Serialize)]
struct SerializedState<'a> {
    root: SerializedNode<'a>,
}

#[derive(Serialize)]
struct ElementFields<'a> {
    children: Vec<SerializedNode<'a>>,
    direction: Option<&'static str>,
    format: &'static str,
    indent: u32,
    version: u32,
}

impl<'a> ElementFields<'a> {
    fn new(children: Vec<SerializedNode<'a>>) -> Self {
        let direction = if children.is_empty() { None } else { Some("ltr") };
        Self {
            children,
            direction,
            format: "",
            indent: 0,
            version: NODE_VERSION,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SerializedNode<'a> {
    Root {
        #[serde(flatten)]
        element: ElementFields<'a>,
    },
    Paragraph {
        #[serde(flatten)]
        element: ElementFields<'a>,
    },
    Heading {
        #[serde(flatten)]
        element: ElementFields<'a>,
        tag: String,
    },
    Quote {
        #[serde(flatten)]
        element: ElementFields<'a>,
    },
    Code {
        #[serde(flatten)]
        element: ElementFields<'a>,
    },
    List {
        #[serde(flatten)]
        element: ElementFields<'a>,
        #[serde(rename = "listType")]
        list_type: &'static str,
        start: u32,
        tag: &'static str,
    },
    Listitem {
        #[serde(flatten)]
        element: ElementFields<'a>,
        value: u32,
    },
    Link {
        #[serde(flatten)]
        element: ElementFields<'a>,
        rel: Option<&'static str>,
        target: Option<&'static str>,
        title: Option<&'static str>,
        url: &'a str,
    },
    Text {
        detail: u32,
        format: u32,
        mode: &'static str,
        style: &'static str,
        text: &'a str,
        version: u32,
    },
    Linebreak {
        version: u32,
    },
}

/// Encode a document as a canonical string
pub fn encode(document: &Document) -> String {
    let state = SerializedState {
        root: SerializedNode::Root {
            element: ElementFields::new(encode_blocks(&document.blocks)),
        },
    };
    // Serializing plain structs with string keys cannot fail
    serde_json::to_string(&state).unwrap_or_default()
}

fn encode_blocks(blocks: &[Block]) -> Vec<SerializedNode<'_>> {
    let mut nodes = Vec::with_capacity(blocks.len());
    let mut idx = 0;

    while idx < blocks.len() {
        let block = &blocks[idx];
        let node = match block.kind {
            BlockKind::Paragraph => SerializedNode::Paragraph { element: block_element(block) },
            BlockKind::Heading(level) => SerializedNode::Heading {
                element: block_element(block),
                tag: format!("h{}", level),
            },
            BlockKind::Quote => SerializedNode::Quote { element: block_element(block) },
            BlockKind::Code => SerializedNode::Code { element: block_element(block) },
            BlockKind::ListItem(kind) => {
                // Consecutive items of one kind share a list node
                let mut items = Vec::new();
                while idx < blocks.len() && blocks[idx].kind.is_list_item_of(kind) {
                    items.push(SerializedNode::Listitem {
                        element: ElementFields::new(encode_inlines(&blocks[idx].children)),
                        value: items.len() as u32 + 1,
                    });
                    idx += 1;
                }
                nodes.push(SerializedNode::List {
                    element: ElementFields::new(items),
                    list_type: kind.as_str(),
                    start: 1,
                    tag: kind.tag(),
                });
                continue;
            }
        };
        nodes.push(node);
        idx += 1;
    }

    nodes
}

fn block_element(block: &Block) -> ElementFields<'_> {
    ElementFields::new(encode_inlines(&block.children))
}

fn encode_inlines(children: &[Inline]) -> Vec<SerializedNode<'_>> {
    let mut nodes = Vec::with_capacity(children.len());
    let mut idx = 0;

    while idx < children.len() {
        match &children[idx] {
            Inline::LineBreak => {
                nodes.push(SerializedNode::Linebreak {
                    version: NODE_VERSION,
                });
                idx += 1;
            }
            Inline::Text(TextRun {
                link: Some(url), ..
            }) => {
                // Neighbouring runs pointing at the same target share a link node
                let mut texts = Vec::new();
                while let Some(Inline::Text(run)) = children.get(idx) {
                    if run.link.as_deref() != Some(url.as_str()) {
                        break;
                    }
                    texts.push(encode_text(run));
                    idx += 1;
                }
                nodes.push(SerializedNode::Link {
                    element: ElementFields::new(texts),
                    rel: Some("noreferrer"),
                    target: None,
                    title: None,
                    url: url.as_str(),
                });
            }
            Inline::Text(run) => {
                nodes.push(encode_text(run));
                idx += 1;
            }
        }
    }

    nodes
}

fn encode_text(run: &TextRun) -> SerializedNode<'_> {
    SerializedNode::Text {
        detail: 0,
        format: run.format.bits(),
        mode: "normal",
        style: "",
        text: &run.text,
        version: NODE_VERSION,
    }
}
