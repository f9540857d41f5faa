//! Config defaults: constants used by the schema plus normalisation of
//! values that parsed but are unusable as given.

use crate::schema::NotionForgeConfig;

pub use notionforge_gateway::server::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_PAGE_TITLE};
pub use notionforge_markdown::{DEFAULT_CHUNK_LIMIT, DEFAULT_MAX_DEPTH};
pub use notionforge_notion::{
    NOTION_API_BASE as DEFAULT_NOTION_API_BASE, NOTION_VERSION as DEFAULT_NOTION_VERSION,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Default max requests per client per window.
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 30;

/// Default window size (seconds).
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

pub const DEFAULT_PARENT_TYPE: &str = "page";

/// Notion accepts at most 100 children per request.
pub const DEFAULT_BATCH_SIZE: usize = notionforge_markdown::MAX_CHILDREN;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: NotionForgeConfig) -> NotionForgeConfig {
    let config = apply_server_defaults(config);
    let config = apply_notion_defaults(config);
    let config = apply_logging_defaults(config);
    config
}

fn or_default(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}

/// Blank strings and empty secrets fall back to their defaults.
fn apply_server_defaults(mut config: NotionForgeConfig) -> NotionForgeConfig {
    or_default(&mut config.server.host, DEFAULT_HOST);
    or_default(&mut config.server.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
    or_default(&mut config.server.default_title, DEFAULT_PAGE_TITLE);
    if config.auth.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        config.auth.api_key = None;
    }
    config
}

/// Ensure the Notion endpoint and parent type are usable.
fn apply_notion_defaults(mut config: NotionForgeConfig) -> NotionForgeConfig {
    let notion = &mut config.notion;
    or_default(&mut notion.api_base, DEFAULT_NOTION_API_BASE);
    notion.api_base = notion.api_base.trim_end_matches('/').to_string();
    or_default(&mut notion.version, DEFAULT_NOTION_VERSION);
    or_default(&mut notion.parent_type, DEFAULT_PARENT_TYPE);
    notion.parent_type = notion.parent_type.trim().to_ascii_lowercase();
    if notion.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
        notion.token = None;
    }
    if notion.parent_id.as_deref().is_some_and(|p| p.trim().is_empty()) {
        notion.parent_id = None;
    }
    config
}

fn apply_logging_defaults(mut config: NotionForgeConfig) -> NotionForgeConfig {
    or_default(&mut config.logging.level, DEFAULT_LOG_LEVEL);
    or_default(&mut config.logging.dir, DEFAULT_LOG_DIR);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_replaced() {
        let mut config = NotionForgeConfig::default();
        config.server.host = "  ".into();
        config.logging.level = String::new();
        config.notion.api_base = "https://example.test/v1/".into();
        config.notion.parent_type = " Database ".into();
        config.notion.token = Some(String::new());

        let config = apply_all_defaults(config);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.notion.api_base, "https://example.test/v1");
        assert_eq!(config.notion.parent_type, "database");
        assert!(config.notion.token.is_none());
    }
}
