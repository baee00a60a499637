//! Folio CLI - inspect, migrate, and edit article bodies.

use clap::Parser;
use folio_cli::commands;
use folio_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout stays clean for piping
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> folio_cli::Result<()> {
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load(Some(path))?,
        None => Config::load_or_create()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter)?,
        Command::Preview(args) => commands::execute_preview(args, &config, &formatter)?,
        Command::Detect(args) => commands::execute_detect(args, &config, &formatter)?,
        Command::Normalize(args) => commands::execute_normalize(args, &config, &formatter)?,
        Command::Inspect(args) => commands::execute_inspect(args, &config, &formatter)?,
        Command::Edit(args) => commands::execute_edit(args, &config, &formatter)?,
    }

    Ok(())
}
