//! CLI Doctor Command
//!
//! Validates the config and, when it is complete, checks that the Notion
//! parent can be reached with the configured token.

use anyhow::Result;

use notionforge_config::{validate, NotionForgeConfig};

use crate::setup;
use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Executes the diagnosis. Returns whether every check passed.
pub async fn run(config: &NotionForgeConfig, offline: bool) -> Result<bool> {
    println!("\nRunning notionforge doctor...\n");

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if !report.is_valid() {
        return Ok(false);
    }
    note_success("Config is complete");

    if offline {
        note_info("Skipping Notion connectivity check");
        return Ok(true);
    }

    if config.notion.parent_type == "page" {
        note_info("Page parents are used as given; the check below only confirms the token");
    }
    let client = setup::notion_client(config)?;
    match client.resolve_parent().await {
        Ok(parent) => {
            note_success(&format!("Notion parent resolved: {parent:?}"));
            Ok(true)
        }
        Err(err) => {
            note_error(&format!("Notion parent check failed: {err}"));
            Ok(false)
        }
    }
}
