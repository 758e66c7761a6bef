// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Purgeline - filter a personal social media archive and purge the
//! selection from the remote service at a safe rate.
//!
//! This is the binary entry point.

mod audit;
mod filters;
mod list;
mod purge;
mod remote;
mod render;
mod shutdown;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use purgeline_config::PurgelineConfig;
use tracing::error;

/// Purgeline - filter an archive export and purge it at a safe rate.
#[derive(Parser, Debug)]
#[command(name = "purgeline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the filtered view with keyword matches highlighted.
    List(filters::FilterArgs),
    /// Rate the filtered view for content risk.
    Audit(audit::AuditArgs),
    /// Delete the filtered view from the remote service.
    Purge(purge::PurgeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            purgeline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.general.log_level);

    let use_color = !cli.plain && std::io::stdout().is_terminal();
    let result = match &cli.command {
        Commands::List(args) => list::run_list(&config, args, use_color).await,
        Commands::Audit(args) => audit::run_audit(&config, args, use_color).await,
        Commands::Purge(args) => purge::run_purge(&config, args, use_color).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("purgeline: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<PurgelineConfig, Vec<purgeline_config::ConfigError>> {
    match path {
        Some(path) => purgeline_config::load_and_validate_path(path),
        None => purgeline_config::load_and_validate(),
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("purgeline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
