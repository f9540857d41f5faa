//! Config file location and loading.

use crate::schema::NotionForgeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the notionforge config directory.
/// Priority: `NOTIONFORGE_CONFIG_DIR` env > `~/.notionforge/` > `./.notionforge`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOTIONFORGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".notionforge"),
        None => PathBuf::from(".notionforge"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist, so the server
/// can run from environment variables alone.
pub async fn load_config(path: &Path) -> Result<NotionForgeConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(NotionForgeConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML config text. An empty document yields the defaults.
pub fn parse_config(raw: &str) -> Result<NotionForgeConfig> {
    if raw.trim().is_empty() {
        return Ok(NotionForgeConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
