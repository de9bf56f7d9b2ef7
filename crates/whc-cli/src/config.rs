//! CLI-level preferences, separate from a run's manifest: which workspace
//! to default to, how much to log, and output formatting — following
//! `shnn-cli::config::CliConfig`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct CliConfig {
    pub default_workspace: Option<String>,
    pub log_level: Option<String>,
    pub preferences: UserPreferences,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserPreferences {
    pub use_colors: bool,
    pub output_format: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            default_workspace: None,
            log_level: Some("info".to_string()),
            preferences: UserPreferences { use_colors: true, output_format: "text".to_string() },
        }
    }
}

impl CliConfig {
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| CliError::config(format!("invalid config file: {e}")))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CliError::config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
