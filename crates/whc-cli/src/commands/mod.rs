//! CLI command implementations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::CliResult;

pub mod init;
pub mod routes;
pub mod run;
pub mod wafer;

/// Command-line driver for the wafer-scale mapping/routing core.
#[derive(Parser, Debug)]
#[command(name = "whc", version, about = "Wafer-scale neuron mapping and L1 routing")]
pub struct WhcCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// CLI preferences file (separate from a run's manifest)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new workspace with a default manifest and config
    #[command(alias = "new")]
    Init(init::InitCommand),

    /// Run the mapping/routing pipeline over a manifest
    Run(run::RunCommand),

    /// Inspect a wafer shape described by a manifest
    Wafer(wafer::WaferCommand),

    /// Explore all simple L1 routes between a source and target chip
    Routes(routes::RoutesCommand),
}

impl WhcCli {
    pub fn execute(self) -> CliResult<()> {
        let workspace = self.workspace.unwrap_or_else(|| std::env::current_dir().expect("current directory is accessible"));
        match self.command {
            Commands::Init(cmd) => cmd.execute(workspace),
            Commands::Run(cmd) => cmd.execute(workspace),
            Commands::Wafer(cmd) => cmd.execute(workspace),
            Commands::Routes(cmd) => cmd.execute(workspace),
        }
    }
}
