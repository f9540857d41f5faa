//! CLI Serve Command
//!
//! Wires config, logging, the Notion client and the limiter into the gateway.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use notionforge_config::{validate, NotionForgeConfig};
use notionforge_gateway::{start_server, GatewayState, SlidingWindowLimiter};
use notionforge_logging::init_logger;

use crate::setup;

/// How often idle rate-limit entries are swept.
const LIMITER_SWEEP: Duration = Duration::from_secs(300);

pub async fn run(mut config: NotionForgeConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    init_logger(&config.logging.dir, &config.logging.level, config.logging.json);

    let report = validate(&config);
    report.log();
    if !report.is_valid() {
        bail!(
            "Config has {} error(s); fix them before serving",
            report.errors.len()
        );
    }

    let store = setup::notion_client(&config)?;
    let limiter =
        SlidingWindowLimiter::new(config.rate_limit.max_requests, config.rate_limit.window_secs);
    let sweeper = limiter.spawn_cleanup(LIMITER_SWEEP);

    // Validation guarantees the key is present.
    let api_key = config.auth.api_key.clone().unwrap_or_default();
    let state = GatewayState::new(Arc::new(store), Arc::new(limiter), api_key)
        .with_converter(setup::converter(&config))
        .with_allowed_origin(&config.server.allowed_origin)
        .with_default_title(&config.server.default_title);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    info!(
        addr = %addr,
        origin = %config.server.allowed_origin,
        parent_type = %config.notion.parent_type,
        "Starting notionforge gateway"
    );
    let result = start_server(addr, state).await;
    sweeper.abort();
    result
}
