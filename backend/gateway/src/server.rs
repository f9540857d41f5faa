//! Main HTTP Gateway Server.
//!
//! Routing, shared state and the listener loop.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use notionforge_markdown::Converter;
use notionforge_notion::DocumentStore;

use crate::auth::API_KEY_HEADER;
use crate::handlers;
use crate::rate_limit::Throttle;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://gemini.google.com";
pub const DEFAULT_PAGE_TITLE: &str = "Gemini Response";

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub converter: Converter,
    pub store: Arc<dyn DocumentStore>,
    pub throttle: Arc<dyn Throttle>,
    pub api_key: String,
    pub allowed_origin: String,
    pub default_title: String,
}

impl GatewayState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        throttle: Arc<dyn Throttle>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            converter: Converter::default(),
            store,
            throttle,
            api_key: api_key.into(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            default_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = origin.into();
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }
}

/// Builds the gateway router with CORS and request tracing applied.
pub fn build_router(state: GatewayState) -> Result<Router> {
    let origin = HeaderValue::from_str(&state.allowed_origin)
        .with_context(|| format!("Invalid allowed origin: {}", state.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)]);

    let app = Router::new()
        .route("/notion", post(handlers::create_page))
        .route("/health", get(handlers::health))
        .route("/key", get(handlers::check_ip))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(app)
}

/// Serves the gateway on an already-bound listener until the future is dropped.
pub async fn serve(listener: TcpListener, state: GatewayState) -> Result<()> {
    let app = build_router(state)?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Starts the main Axum HTTP server for the gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);
    serve(listener, state).await
}
