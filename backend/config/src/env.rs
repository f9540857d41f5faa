//! Environment handling for config values.
//!
//! Two mechanisms, applied in this order by [`crate::load_and_prepare`]:
//! - `${VAR_NAME}` references inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` escapes to `${VAR}`.
//! - Well-known variables (`NOTION_TOKEN`, `NOTIONFORGE_PORT`, ...) that
//!   override whole fields, so a deployment can run without a config file.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::NotionForgeConfig;

/// Either a `$${VAR}` escape or a `${VAR}` reference.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. Returns an error if any referenced env
/// var is not set or is empty.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Override config fields from the process environment.
pub fn apply_env_overrides(config: NotionForgeConfig) -> Result<NotionForgeConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Override config fields from a provided map (useful for testing).
///
/// Empty variables are ignored. `NOTION_API_KEY` is the shared secret browser
/// clients send; `NOTION_TOKEN` is the integration token sent to Notion.
pub fn apply_env_overrides_with(
    mut config: NotionForgeConfig,
    env: &HashMap<String, String>,
) -> Result<NotionForgeConfig> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(host) = get("NOTIONFORGE_HOST") {
        config.server.host = host.to_string();
    }
    if let Some(port) = get("NOTIONFORGE_PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("NOTIONFORGE_PORT is not a valid port: {port}"))?;
    }
    if let Some(key) = get("NOTION_API_KEY") {
        config.auth.api_key = Some(key.to_string());
    }
    if let Some(token) = get("NOTION_TOKEN") {
        config.notion.token = Some(token.to_string());
    }
    if let Some(parent) = get("NOTION_PARENT_PAGE_ID") {
        config.notion.parent_id = Some(parent.to_string());
    }
    if let Some(kind) = get("NOTION_PARENT_TYPE") {
        config.notion.parent_type = kind.to_string();
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level.to_string();
    }
    Ok(config)
}
