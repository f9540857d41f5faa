//! CLI Push Command
//!
//! Converts markdown and creates the page directly, without the gateway.

use anyhow::{Context, Result};
use std::path::Path;

use notionforge_config::NotionForgeConfig;
use notionforge_notion::DocumentStore;

use crate::convert_cmd::read_input;
use crate::setup;
use crate::terminal_output::note_success;

pub async fn run(config: &NotionForgeConfig, title: Option<String>, file: Option<&Path>) -> Result<()> {
    let client = setup::notion_client(config)?;
    let markdown = read_input(file).await?;
    let title = title.unwrap_or_else(|| config.server.default_title.clone());

    let blocks = setup::converter(config).convert(&markdown);
    let page = client
        .create_page(&title, &blocks)
        .await
        .context("Failed to create Notion page")?;

    note_success(&format!(
        "Created '{title}' with {} blocks in {} request(s)",
        blocks.len(),
        page.batches
    ));
    if let Some(url) = page.url {
        println!("{url}");
    }
    Ok(())
}
