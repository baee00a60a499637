//! Command implementations.

mod detect;
mod edit;
mod extract;
mod inspect;
mod normalize;
mod preview;

pub use detect::{detect, execute_detect};
pub use edit::execute_edit;
pub use extract::{execute_extract, summarize};
pub use inspect::execute_inspect;
pub use normalize::{execute_normalize, load_document, normalize};
pub use preview::{execute_preview, preview};

use crate::error::Result;
use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Read a Document string from a file, or from stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(content)
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}
