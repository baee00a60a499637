//! Normalize command implementation.

use crate::cli::InputArgs;
use crate::commands::read_input;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use folio_domain::Document;
use folio_editor::{EditorAdapter, MemorySurface};

/// Execute the normalize command.
pub fn execute_normalize(args: InputArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let content = read_input(args.file.as_deref())?;
    let canonical = normalize(&content, config)?;

    if formatter.format() == OutputFormat::Json {
        let tree: serde_json::Value = serde_json::from_str(&canonical)?;
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("{}", canonical);
    }
    Ok(())
}

/// Load `content` the way the editor does.
pub fn load_document(content: &str, config: &Config) -> Result<EditorAdapter<MemorySurface>> {
    Ok(EditorAdapter::with_content(
        MemorySurface::new(),
        config.editor.clone(),
        Some(content),
    )?)
}

/// Canonical form of `content` after a round trip through the editor.
pub fn normalize(content: &str, config: &Config) -> Result<String> {
    Ok(load_document(content, config)?.content())
}

/// Blocks of `content` as the editor holds them.
pub(crate) fn document_of(content: &str, config: &Config) -> Result<Document> {
    Ok(load_document(content, config)?.document().clone())
}
