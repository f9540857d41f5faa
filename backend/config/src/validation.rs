//! Config validation: checks that a loaded config can actually serve requests.

use crate::defaults::DEFAULT_CHUNK_LIMIT;
use crate::schema::NotionForgeConfig;
use thiserror::Error;

/// Notion rejects requests with more than this many children.
const MAX_BATCH_SIZE: usize = 100;

/// Below this depth ordinary nested emphasis starts degrading to literal text.
const MIN_USEFUL_DEPTH: usize = 4;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding through `tracing`. Call once the subscriber is installed.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &NotionForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_auth(config, &mut report);
    validate_rate_limit(config, &mut report);
    validate_notion(config, &mut report);
    validate_converter(config, &mut report);
    report
}

/// Values shipped in sample configs that were never filled in.
fn is_placeholder(value: &str) -> bool {
    value.trim().starts_with("YOUR_")
}

fn require_secret(report: &mut ValidationReport, path: &str, value: Option<&str>) {
    match value {
        None => report.error(path, "Value is required"),
        Some(v) if is_placeholder(v) => {
            report.error(path, "Value is still a placeholder; set the real value")
        }
        Some(_) => {}
    }
}

fn validate_auth(config: &NotionForgeConfig, report: &mut ValidationReport) {
    require_secret(report, "auth.apiKey", config.auth.api_key.as_deref());
}

fn validate_rate_limit(config: &NotionForgeConfig, report: &mut ValidationReport) {
    let limit = &config.rate_limit;
    if limit.max_requests == 0 {
        report.error("rateLimit.maxRequests", "Must be at least 1; every request would be rejected");
    }
    if limit.window_secs == 0 {
        report.error("rateLimit.windowSecs", "Window must be at least one second");
    }
}

fn validate_notion(config: &NotionForgeConfig, report: &mut ValidationReport) {
    let notion = &config.notion;
    require_secret(report, "notion.token", notion.token.as_deref());
    require_secret(report, "notion.parentId", notion.parent_id.as_deref());

    if !matches!(notion.parent_type.as_str(), "page" | "database" | "auto") {
        report.error(
            "notion.parentType",
            format!("Unknown parent type '{}'; expected page, database or auto", notion.parent_type),
        );
    }
    if notion.batch_size == 0 || notion.batch_size > MAX_BATCH_SIZE {
        report.error(
            "notion.batchSize",
            format!("Must be between 1 and {MAX_BATCH_SIZE}, got {}", notion.batch_size),
        );
    }
}

fn validate_converter(config: &NotionForgeConfig, report: &mut ValidationReport) {
    let converter = &config.converter;
    if converter.chunk_limit == 0 {
        report.error("converter.chunkLimit", "Must be at least 1");
    } else if converter.chunk_limit > DEFAULT_CHUNK_LIMIT {
        report.warn(
            "converter.chunkLimit",
            format!("Notion rejects runs longer than {DEFAULT_CHUNK_LIMIT} characters"),
        );
    }
    if converter.max_depth < MIN_USEFUL_DEPTH {
        report.warn(
            "converter.maxDepth",
            "Very low depth; nested emphasis and quotes will render as literal text",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NotionForgeConfig {
        let mut config = NotionForgeConfig::default();
        config.auth.api_key = Some("k-123".into());
        config.notion.token = Some("secret_abc".into());
        config.notion.parent_id = Some("0123456789abcdef0123456789abcdef".into());
        config
    }

    fn paths(errors: &[ConfigValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn complete_config_is_valid() {
        let report = validate(&complete());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn default_config_lacks_secrets() {
        let report = validate(&NotionForgeConfig::default());
        assert_eq!(
            paths(&report.errors),
            vec!["auth.apiKey", "notion.token", "notion.parentId"]
        );
    }

    #[test]
    fn placeholders_are_errors() {
        let mut config = complete();
        config.notion.token = Some("YOUR_NOTION_INTEGRATION_TOKEN".into());
        config.auth.api_key = Some("YOUR_API_KEY_HERE".into());
        let report = validate(&config);
        assert_eq!(paths(&report.errors), vec!["auth.apiKey", "notion.token"]);
        assert!(report.errors[0].message.contains("placeholder"));
    }

    #[test]
    fn zero_limits_are_errors() {
        let mut config = complete();
        config.rate_limit.max_requests = 0;
        config.rate_limit.window_secs = 0;
        config.notion.batch_size = 0;
        config.converter.chunk_limit = 0;
        let report = validate(&config);
        assert_eq!(
            paths(&report.errors),
            vec![
                "rateLimit.maxRequests",
                "rateLimit.windowSecs",
                "notion.batchSize",
                "converter.chunkLimit"
            ]
        );
    }

    #[test]
    fn oversized_batch_and_unknown_parent_type() {
        let mut config = complete();
        config.notion.batch_size = 101;
        config.notion.parent_type = "workspace".into();
        let report = validate(&config);
        assert_eq!(paths(&report.errors), vec!["notion.parentType", "notion.batchSize"]);
    }

    #[test]
    fn generous_chunks_and_shallow_depth_warn() {
        let mut config = complete();
        config.converter.chunk_limit = 5000;
        config.converter.max_depth = 2;
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(
            paths(&report.warnings),
            vec!["converter.chunkLimit", "converter.maxDepth"]
        );
    }
}
