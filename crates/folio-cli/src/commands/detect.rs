//! Detect command implementation.

use crate::cli::InputArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::output::{Detection, Formatter};
use folio_codec::{render_mode, StoredContent};

/// Execute the detect command.
pub fn execute_detect(args: InputArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let content = read_input(args.file.as_deref())?;
    println!("{}", formatter.format_detection(&detect(&content, config))?);
    Ok(())
}

/// Classify `content` and count the blocks it loads as.
pub fn detect(content: &str, config: &Config) -> Detection {
    let stored = StoredContent::classify(content);
    let encoding = stored.encoding();
    let document = stored.into_document(config.editor.markup_engine);

    Detection {
        encoding,
        render_mode: render_mode(content),
        blocks: document.block_count(),
    }
}
