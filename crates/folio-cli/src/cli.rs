//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use folio_extractor::MarkupEngine;
use std::path::PathBuf;

/// Folio CLI - Inspect, migrate, and edit article bodies.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// Markup backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// Parse markup into a DOM tree
    Dom,
    /// Strip tags with a regular expression
    Regex,
}

impl From<BackendArg> for MarkupEngine {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Dom => MarkupEngine::Dom,
            BackendArg::Regex => MarkupEngine::Regex,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a one-line plain-text summary
    Extract(ExtractArgs),

    /// Print multi-line preview text
    Preview(InputArgs),

    /// Report the encoding and how a detail page would render it
    Detect(InputArgs),

    /// Load through the editor and print canonical form
    Normalize(InputArgs),

    /// List the blocks of a document
    Inspect(InputArgs),

    /// Edit a document interactively
    Edit(EditArgs),
}

/// A Document string source.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// File to read; stdin when absent or `-`
    pub file: Option<PathBuf>,
}

/// Arguments for the extract command.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum summary length in characters
    #[arg(short = 'n', long)]
    pub max_length: Option<usize>,

    /// Markup backend
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,
}

/// Arguments for the edit command.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// File to edit; created on save if it does not exist
    pub file: Option<PathBuf>,

    /// Where `save` writes (defaults to FILE)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
