//! Inspect command implementation.

use crate::cli::InputArgs;
use crate::commands::normalize::document_of;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the inspect command.
pub fn execute_inspect(args: InputArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let content = read_input(args.file.as_deref())?;
    let document = document_of(&content, config)?;
    println!("{}", formatter.format_blocks(&document)?);
    Ok(())
}
