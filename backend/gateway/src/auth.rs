//! Gateway Authentication Module
//!
//! Guards the transfer route: rate limit, then shared API key, then origin.

use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, header::ORIGIN, request::Parts},
};
use serde_json::{Value, json};
use tracing::warn;

use notionforge_logging::{EventLogger, TransferEvent};

use crate::client_ip::{resolve_client_ip, socket_addr};
use crate::server::GatewayState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub type GuardRejection = (StatusCode, Json<Value>);

/// Proof that the request passed every guard, carrying the caller's address.
pub struct RequireApiKey {
    pub client_ip: String,
}

#[async_trait]
impl FromRequestParts<GatewayState> for RequireApiKey {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let client_ip = resolve_client_ip(&parts.headers, socket_addr(parts));

        if !state.throttle.allow(&client_ip).await {
            return Err(reject(&client_ip, StatusCode::TOO_MANY_REQUESTS, "Too many requests"));
        }

        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|val| val.to_str().ok());
        if presented != Some(state.api_key.as_str()) {
            warn!(client = %client_ip, "Unauthorized access attempt");
            return Err(reject(&client_ip, StatusCode::UNAUTHORIZED, "Unauthorized"));
        }

        let origin = parts
            .headers
            .get(ORIGIN)
            .and_then(|val| val.to_str().ok())
            .unwrap_or("");
        if !origin.is_empty() && !origin.contains(origin_host(&state.allowed_origin)) {
            warn!(client = %client_ip, origin = %origin, "Invalid origin");
            return Err(reject(&client_ip, StatusCode::FORBIDDEN, "Forbidden"));
        }

        Ok(RequireApiKey { client_ip })
    }
}

/// Host part of a configured origin: `https://gemini.google.com` gives `gemini.google.com`.
pub fn origin_host(origin: &str) -> &str {
    let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    rest.trim_end_matches('/')
}

fn reject(client_ip: &str, status: StatusCode, message: &str) -> GuardRejection {
    EventLogger::log_event(
        client_ip,
        TransferEvent::Rejected {
            reason: message.to_string(),
        },
    );
    (status, Json(json!({ "error": message })))
}
