//! `notionforge-config`: notionforge runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, auth, rate limit, Notion, converter, logging)
//! - YAML loading with defaults for a missing file
//! - `${ENV_VAR}` substitution and environment overrides
//! - Config redaction for safe display
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    AuthConfig, ConverterConfig, LoggingConfig, NotionConfig, NotionForgeConfig, RateLimitConfig,
    ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load a config file, substitute env vars, apply env overrides and defaults.
///
/// This is the main entry point for loading a config at runtime. Validation is
/// left to the caller so the report can be logged once logging is running.
pub async fn load_and_prepare(path: &Path) -> Result<NotionForgeConfig> {
    let raw_config = load_config(path).await?;
    let config = substitute_env(&raw_config)?;
    let config = apply_env_overrides(config)?;
    Ok(apply_all_defaults(config))
}

fn substitute_env(config: &NotionForgeConfig) -> Result<NotionForgeConfig> {
    let value: Value =
        serde_json::to_value(config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    serde_json::from_value(value).context("Failed to deserialize config after processing")
}

/// Redacted JSON snapshot of `config`, safe to print.
pub fn redacted_snapshot(config: &NotionForgeConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_file_with_defaults_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(
            &path,
            "server:\n  host: ''\nnotion:\n  parentType: AUTO\n  apiBase: https://api.example.test/v1/\n",
        )
        .unwrap();

        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.server.host, defaults::DEFAULT_HOST);
        assert_eq!(config.notion.parent_type, "auto");
        assert_eq!(config.notion.api_base, "https://api.example.test/v1");
    }

    #[tokio::test]
    async fn unresolved_reference_fails_preparation() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "auth:\n  apiKey: ${NOTIONFORGE_TEST_UNSET_VAR_7F3A}\n").unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("NOTIONFORGE_TEST_UNSET_VAR_7F3A"));
    }

    #[test]
    fn snapshot_hides_secrets() {
        let mut config = NotionForgeConfig::default();
        config.notion.token = Some("secret_0123456789".into());
        let snapshot = redacted_snapshot(&config).unwrap();
        assert_eq!(snapshot["notion"]["token"], "secr***");
        assert_eq!(snapshot["server"]["port"], 5000);
    }
}
