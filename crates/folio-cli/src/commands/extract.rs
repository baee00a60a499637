//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use folio_extractor::{Summary, TextExtractor};

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let content = read_input(args.input.file.as_deref())?;
    let summary = summarize(&content, &args, config)?;
    println!("{}", formatter.format_summary(&summary)?);
    Ok(())
}

/// Summarize `content`, with command-line flags overriding the config.
pub fn summarize(content: &str, args: &ExtractArgs, config: &Config) -> Result<Summary> {
    let mut extractor_config = config.extractor.clone();
    if let Some(max_length) = args.max_length {
        extractor_config.max_length = max_length;
    }
    if let Some(backend) = args.backend {
        extractor_config.backend = backend.into();
    }

    let extractor = TextExtractor::new(extractor_config)?;
    Ok(extractor.summarize(content))
}
