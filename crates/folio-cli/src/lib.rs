//! Folio CLI library.
//!
//! Command-line access to the Folio content core: summaries, previews,
//! encoding detection, legacy migration, block inspection, and an
//! interactive editing session.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
