//! notionforge runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section may be omitted;
//! missing fields take the values in [`crate::defaults`].

use serde::{Deserialize, Serialize};

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for notionforge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionForgeConfig {
    /// HTTP listener and browser-facing settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared secret expected in `X-API-Key`
    #[serde(default)]
    pub auth: AuthConfig,

    /// Per-client request throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Destination workspace
    #[serde(default)]
    pub notion: NotionConfig,

    /// Markdown conversion limits
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Only browser requests from this origin are accepted.
    pub allowed_origin: String,
    /// Page title used when a request omits one.
    pub default_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            default_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitConfig {
    /// Max requests allowed per window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotionConfig {
    /// Internal integration token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Page or database receiving new pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// `page`, `database` or `auto`.
    pub parent_type: String,
    pub api_base: String,
    pub version: String,
    /// Children per create/append request.
    pub batch_size: usize,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            parent_id: None,
            parent_type: DEFAULT_PARENT_TYPE.to_string(),
            api_base: DEFAULT_NOTION_API_BASE.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterConfig {
    /// Max characters per rich-text run.
    pub chunk_limit: usize,
    /// Nesting depth for emphasis and blockquotes.
    pub max_depth: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rolling JSON log file.
    pub dir: String,
    /// Emit console output as JSON instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: DEFAULT_LOG_DIR.to_string(),
            json: false,
        }
    }
}
