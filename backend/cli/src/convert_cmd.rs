//! CLI Convert Command
//!
//! Prints the Notion block JSON for a markdown file or stdin.

use anyhow::{Context, Result};
use std::path::Path;

use notionforge_markdown::Converter;

/// Reads `file`, or all of stdin when absent.
pub async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            use tokio::io::AsyncReadExt;
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Block JSON for `markdown`, pretty-printed.
pub fn render(converter: &Converter, markdown: &str) -> Result<String> {
    let blocks = converter.convert(markdown);
    serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")
}

pub async fn run(converter: &Converter, file: Option<&Path>) -> Result<()> {
    let markdown = read_input(file).await?;
    println!("{}", render(converter, &markdown)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_block_array() {
        let out = render(&Converter::default(), "# Title\n---").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["type"], "heading_1");
        assert_eq!(value[1]["type"], "divider");
    }

    #[test]
    fn empty_input_is_empty_array() {
        assert_eq!(render(&Converter::default(), "").unwrap(), "[]");
    }

    #[tokio::test]
    async fn reads_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(read_input(Some(&path)).await.unwrap(), "hello");
    }
}
