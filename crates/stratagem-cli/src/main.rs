//! Stratagem CLI
//!
//! Renders and extracts go-to-market strategies and administers the
//! file-backed strategy cache.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use stratagem_core::StratagemConfig;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = StratagemConfig::load(args.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match args.command {
        Command::Render {
            file,
            variant,
            validate,
        } => commands::render(&config, &file, variant, validate),
        Command::Parse { file } => commands::parse(&file),
        Command::Extract { file, id } => commands::extract(&config, &file, &id),
        Command::Cache { action } => commands::cache(&config, action),
        Command::Config { action } => commands::config(args.config.as_deref(), &config, action),
    }
}

/// Install the subscriber; `log` records from the libraries are bridged in.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
