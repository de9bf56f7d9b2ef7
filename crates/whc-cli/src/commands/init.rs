//! Workspace initialization command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;

/// Scaffold a new workspace: a default manifest and a CLI preferences file
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Workspace directory name, created under the target workspace
    pub name: String,
}

const DEFAULT_MANIFEST: &str = r#"# Example whc manifest: a small all-to-all projection across two chips.

[wafer]
hicanns = [[17, 8], [18, 8]]

[[populations]]
name = "pre"
size = 64

[[populations]]
name = "post"
size = 64
pin_hicann = [18, 8]

[[projections]]
pre = "pre"
post = "post"
target = "excitatory"

[pipeline]
merger_strategy = "minimize-sending-repeaters"
l1_address_strategy = "high-first"
l1_algorithm = "backbone"
"#;

impl InitCommand {
    pub fn execute(self, workspace: PathBuf) -> CliResult<()> {
        info!("initializing workspace: {}", self.name);

        let dir = workspace.join(&self.name);
        std::fs::create_dir_all(&dir)?;

        std::fs::write(dir.join("manifest.toml"), DEFAULT_MANIFEST)?;
        CliConfig::default().save_to_file(&dir.join("whc.toml"))?;

        info!("wrote {}/manifest.toml and {}/whc.toml", self.name, self.name);
        Ok(())
    }
}
