//! Builds runtime components from a prepared config.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use notionforge_config::{config_dir, config_file_path, load_and_prepare, NotionForgeConfig};
use notionforge_markdown::{ConvertOptions, Converter};
use notionforge_notion::{NotionClient, ParentKind};

/// Loads the config from `explicit`, or from the default config directory.
pub async fn load(explicit: Option<&Path>) -> Result<NotionForgeConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_file_path(&config_dir()),
    };
    load_and_prepare(&path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

pub fn converter(config: &NotionForgeConfig) -> Converter {
    Converter::new(ConvertOptions {
        chunk_limit: config.converter.chunk_limit,
        max_depth: config.converter.max_depth,
    })
}

/// Notion client for the configured token and parent.
pub fn notion_client(config: &NotionForgeConfig) -> Result<NotionClient> {
    let notion = &config.notion;
    let token = notion
        .token
        .as_deref()
        .ok_or_else(|| anyhow!("notion.token is not set (NOTION_TOKEN)"))?;
    let parent_id = notion
        .parent_id
        .as_deref()
        .ok_or_else(|| anyhow!("notion.parentId is not set (NOTION_PARENT_PAGE_ID)"))?;
    let kind: ParentKind = notion.parent_type.parse().map_err(|e: String| anyhow!(e))?;

    Ok(NotionClient::new(token, parent_id)
        .with_base_url(&notion.api_base)
        .with_version(&notion.version)
        .with_parent_kind(kind)
        .with_batch_size(notion.batch_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converter_takes_configured_limits() {
        let mut config = NotionForgeConfig::default();
        config.converter.chunk_limit = 10;
        config.converter.max_depth = 3;
        let options = converter(&config).options();
        assert_eq!(options.chunk_limit, 10);
        assert_eq!(options.max_depth, 3);
    }

    #[test]
    fn client_requires_token_and_parent() {
        let mut config = NotionForgeConfig::default();
        let err = notion_client(&config).err().unwrap().to_string();
        assert!(err.contains("notion.token"));

        config.notion.token = Some("secret_abc".into());
        let err = notion_client(&config).err().unwrap().to_string();
        assert!(err.contains("notion.parentId"));

        config.notion.parent_id = Some("abc".into());
        config.notion.parent_type = "nonsense".into();
        assert!(notion_client(&config).is_err());

        config.notion.parent_type = "auto".into();
        assert!(notion_client(&config).is_ok());
    }

    #[tokio::test]
    async fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "converter:\n  maxDepth: 7\n").unwrap();
        let config = load(Some(&path)).await.unwrap();
        assert_eq!(config.converter.max_depth, 7);
    }
}
