mod cli;
mod commands;
mod samples;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use sift_core::Settings;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Chunk {
            file,
            chunk_size,
            chunk_overlap,
        } => commands::chunk(file, chunk_size, chunk_overlap),
        Command::Ingest { path } => commands::ingest(&load_settings(&cli.config)?, &path).await,
        Command::Ask { question, web } => {
            commands::ask(&load_settings(&cli.config)?, &question, web).await
        }
        Command::Demo => commands::demo(&load_settings(&cli.config)?).await,
        Command::Search { query } => commands::search(&load_settings(&cli.config)?, &query).await,
    }
}

/// Only commands that talk to a model or the index read configuration.
fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = Settings::load(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
