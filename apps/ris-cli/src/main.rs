mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use ris_core::config::Config;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,ris_index=info,ris_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;

    match cli.command {
        Command::Index { limit } => commands::index(&settings, limit),
        Command::Search(args) => commands::search(&settings, args, cli.json),
        Command::Sku { sku, similar, top_k } => commands::sku(&settings, &sku, similar, top_k, cli.json),
    }
}
