//! Client address resolution for logging and throttling.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Used when neither a proxy header nor a socket address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First entry of `X-Forwarded-For`, else the socket IP, else `"unknown"`.
pub fn resolve_client_ip(headers: &HeaderMap, socket: Option<SocketAddr>) -> String {
    header_ip(headers, "x-forwarded-for")
        .or_else(|| socket.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// `X-Real-IP` as set by a fronting proxy, else the socket IP.
pub fn resolve_real_ip(headers: &HeaderMap, socket: Option<SocketAddr>) -> String {
    header_ip(headers, "x-real-ip")
        .or_else(|| socket.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

pub(crate) fn socket_addr(parts: &Parts) -> Option<SocketAddr> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Extractor yielding the caller's address as resolved by [`resolve_client_ip`].
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(resolve_client_ip(&parts.headers, socket_addr(parts))))
    }
}

/// Extractor yielding the address as resolved by [`resolve_real_ip`].
pub struct RealIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RealIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RealIp(resolve_real_ip(&parts.headers, socket_addr(parts))))
    }
}
