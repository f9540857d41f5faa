//! notionforge HTTP gateway
//!
//! Accepts markdown from the browser userscript, converts it and hands the
//! blocks to a [`notionforge_notion::DocumentStore`].

pub mod auth;
pub mod client_ip;
pub mod handlers;
pub mod rate_limit;
pub mod server;

pub use auth::RequireApiKey;
pub use client_ip::{resolve_client_ip, ClientIp};
pub use rate_limit::{SlidingWindowLimiter, Throttle};
pub use server::{build_router, serve, start_server, GatewayState};
