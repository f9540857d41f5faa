//! Route handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use notionforge_logging::{EventLogger, TransferEvent, redact_sensitive_data};

use crate::auth::RequireApiKey;
use crate::client_ip::{ClientIp, RealIp};
use crate::server::GatewayState;

/// Body of `POST /notion`.
#[derive(Debug, Default, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Handler for `POST /notion`: convert the markdown and create a page.
pub async fn create_page(
    State(state): State<GatewayState>,
    RequireApiKey { client_ip }: RequireApiKey,
    Json(request): Json<TransferRequest>,
) -> (StatusCode, Json<Value>) {
    let title = request.title.unwrap_or_else(|| state.default_title.clone());
    let content = request.content.unwrap_or_default();

    let converter = state.converter;
    let blocks = match tokio::task::spawn_blocking(move || converter.convert(&content)).await {
        Ok(blocks) => blocks,
        Err(err) => {
            error!(client = %client_ip, error = %err, "Conversion task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "Conversion failed" })),
            );
        }
    };
    match state.store.create_page(&title, &blocks).await {
        Ok(page) => {
            info!(client = %client_ip, title = %title, blocks = blocks.len(), store = state.store.name(), "Page created");
            EventLogger::log_event(
                &client_ip,
                TransferEvent::Created {
                    title,
                    blocks: blocks.len(),
                    batches: page.batches,
                },
            );
            (StatusCode::OK, Json(json!({ "status": "success" })))
        }
        Err(err) => {
            let message = redact_sensitive_data(&err.to_string());
            error!(client = %client_ip, error = %message, "Page creation failed");
            EventLogger::log_event(
                &client_ip,
                TransferEvent::Failed {
                    message: message.clone(),
                },
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": message })),
            )
        }
    }
}

/// Handler for `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Handler for `GET /key`: records the address a fronting proxy reports.
pub async fn check_ip(RealIp(client_ip): RealIp) -> &'static str {
    info!(client = %client_ip, "Actual client IP");
    "IP Checked"
}

/// Fallback for unknown routes.
pub async fn not_found(ClientIp(client_ip): ClientIp, uri: Uri) -> (StatusCode, Json<Value>) {
    warn!(client = %client_ip, path = %uri.path(), "404 access attempt");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
