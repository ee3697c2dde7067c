//! CLI entry point for the paper-digest tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod settings;

use app_config::load_default_file_config;
use cli::{Cli, Command};
use settings::resolve_default_log_level;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    let loaded_config = load_default_file_config()?;
    let file_config = loaded_config.config.as_ref();

    // Priority: RUST_LOG env var > CLI flags > config file > default (info)
    let default_level = resolve_default_log_level(
        cli.verbose,
        cli.quiet,
        file_config.and_then(|c| c.verbosity),
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?cli, config_loaded = loaded_config.loaded_from_file(), "CLI arguments parsed");

    match &cli.command {
        Command::Pick(args) => commands::run_pick_command(args, file_config).await,
        Command::Topic(args) => commands::run_topic_command(args, file_config),
        Command::Check(args) => commands::run_check_command(args, file_config),
        Command::Config => {
            commands::run_config_show_command(&loaded_config, cli.verbose, cli.quiet)
        }
    }
}
