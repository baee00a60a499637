//! Preview command implementation.

use crate::cli::InputArgs;
use crate::commands::read_input;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use folio_extractor::TextExtractor;

/// Execute the preview command.
pub fn execute_preview(args: InputArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let content = read_input(args.file.as_deref())?;
    let text = preview(&content, config)?;

    if formatter.format() == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "preview": text }))?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Multi-line preview text of `content`.
pub fn preview(content: &str, config: &Config) -> Result<String> {
    let extractor = TextExtractor::new(config.extractor.clone())?;
    Ok(extractor.preview(content))
}
