//! CLI Status Command
//!
//! Asks a locally running gateway for its health.

use anyhow::Result;

use crate::terminal_output::{note_success, note_warn};

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/health");
    match reqwest::get(&url).await {
        Ok(resp) => {
            let status = resp.status();
            let body: serde_json::Value = resp.json().await?;
            if status.is_success() {
                note_success(&format!("notionforge is running on port {port}"));
            } else {
                note_warn(&format!("notionforge answered {status} on port {port}"));
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => note_warn(&format!("notionforge is not running on port {port}")),
    }
    Ok(())
}
