//! Edit command implementation.

use crate::cli::EditArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl;
use anyhow::Context;

/// Execute the edit command.
///
/// A FILE that does not exist yet starts an empty document.
pub fn execute_edit(args: EditArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let initial = match &args.file {
        Some(path) if path.exists() => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        _ => None,
    };
    let target = args.output.or(args.file);

    repl::run_edit_session(initial.as_deref(), target, config, formatter)
}
