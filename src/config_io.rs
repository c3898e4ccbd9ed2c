//! Loading the pipeline configuration from disk.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Config, DEFAULT_CONFIG_FILE};

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, `theme-bridge.json` in the
/// working directory is used when present, and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                read_config(default_path)
            } else {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}
