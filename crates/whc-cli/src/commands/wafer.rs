//! Wafer inspection command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::error::CliResult;
use crate::manifest::{build_wafer, Manifest};

/// Report the present HICANNs and driver-chain capacity of a manifest's wafer
#[derive(Args, Debug)]
pub struct WaferCommand {
    /// Manifest file (defaults to `<workspace>/manifest.toml`)
    pub manifest: Option<PathBuf>,
}

impl WaferCommand {
    pub fn execute(self, workspace: PathBuf) -> CliResult<()> {
        let path = self.manifest.unwrap_or_else(|| workspace.join("manifest.toml"));
        let content = std::fs::read_to_string(&path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        let resources = build_wafer(&manifest.wafer)?;

        let present: Vec<_> = resources.present_iter().collect();
        info!("{} HICANN(s) present", present.len());
        for hicann in &present {
            let max_chain = resources.max_chain_length(hicann);
            println!("  ({}, {}): max synapse-driver chain {}", hicann.x(), hicann.y(), max_chain);
        }
        Ok(())
    }
}
