//! Pipeline run command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use whc_pipeline::run_pipeline;

use crate::error::CliResult;
use crate::manifest::{build_bio_graph, build_pipeline_config, build_wafer, Manifest};

/// Run the placement/routing/synapse-driver pipeline over a manifest
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Manifest file (defaults to `<workspace>/manifest.toml`)
    pub manifest: Option<PathBuf>,
}

impl RunCommand {
    pub fn execute(self, workspace: PathBuf) -> CliResult<()> {
        let path = self.manifest.unwrap_or_else(|| workspace.join("manifest.toml"));
        let content = std::fs::read_to_string(&path)?;
        let manifest: Manifest = toml::from_str(&content)?;

        let resources = build_wafer(&manifest.wafer)?;
        let (bio, names, edge_ids) = build_bio_graph(&manifest.populations, &manifest.projections)?;
        let config = build_pipeline_config(&manifest.pipeline, &manifest.populations, &manifest.projections, &names, &edge_ids)?;

        info!("running pipeline over {} population(s), {} projection(s)", manifest.populations.len(), manifest.projections.len());
        let result = run_pipeline(&bio, &resources, &config)?;

        println!("{}", result.stats);
        if !result.placement_losses.is_empty() {
            println!("placement losses:");
            for loss in &result.placement_losses {
                println!("  population {:?} slice {:?}", loss.population, loss.slice);
            }
        }
        if !result.unroutable_blocks.is_empty() {
            println!("unroutable blocks:");
            for (hicann, blocks) in &result.unroutable_blocks {
                println!("  ({}, {}): {} block(s)", hicann.x(), hicann.y(), blocks.len());
            }
        }
        Ok(())
    }
}
