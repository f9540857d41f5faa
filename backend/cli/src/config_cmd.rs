//! CLI Config Command
//!
//! Prints the effective config with secrets masked. The masked field paths
//! are listed on stderr so stdout stays valid JSON.

use anyhow::{Context, Result};

use notionforge_config::{collect_redacted_paths, redacted_snapshot, NotionForgeConfig};

/// Pretty JSON snapshot plus the paths of the fields that were masked.
pub fn render(config: &NotionForgeConfig) -> Result<(String, Vec<String>)> {
    let raw = serde_json::to_value(config).context("Failed to serialize config")?;
    let mut masked = collect_redacted_paths(&raw);
    masked.sort();
    let snapshot = redacted_snapshot(config)?;
    Ok((serde_json::to_string_pretty(&snapshot)?, masked))
}

pub fn run(config: &NotionForgeConfig) -> Result<()> {
    let (json, masked) = render(config)?;
    println!("{json}");
    if !masked.is_empty() {
        eprintln!("masked: {}", masked.join(", "));
    }
    Ok(())
}
