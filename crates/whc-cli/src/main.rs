//! Command-line driver for the wafer-scale mapping/routing core.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod manifest;

use commands::WhcCli;
use config::CliConfig;
use error::CliResult;

fn main() -> CliResult<()> {
    let cli = WhcCli::parse();

    let preferences = match &cli.config {
        Some(path) => CliConfig::load_from_file(path)?,
        None => CliConfig::default(),
    };
    let default_level = if cli.verbose { "debug".to_string() } else { preferences.log_level.unwrap_or_else(|| "info".to_string()) };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    if let Err(err) = cli.execute() {
        error!("command failed: {}", err);
        std::process::exit(1);
    }
    Ok(())
}
