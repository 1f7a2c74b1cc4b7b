//! Route handlers organized by domain.

pub mod blob;
pub mod debug;
pub mod document;
pub mod health;
pub mod proxy;
pub mod share;
pub mod shorturl;
pub mod upload;

use axum::http::{HeaderMap, header};

use crate::state::{AppState, link_base_url};

/// Value of the Host header, or `localhost:3000` when absent.
pub(crate) fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost:3000")
        .to_string()
}

/// Origin the browser used to reach the portal.
///
/// The configured public URL wins; otherwise the `Origin` header, then the
/// Host header with `http` for local hosts and `https` elsewhere.
pub(crate) fn request_origin(state: &AppState, headers: &HeaderMap) -> String {
    if !state.config.server.public_base_url.is_empty() {
        return link_base_url(&state.config);
    }
    if let Some(origin) = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null")
    {
        return origin.trim_end_matches('/').to_string();
    }
    let host = request_host(headers);
    let scheme = if host.contains("localhost") { "http" } else { "https" };
    format!("{scheme}://{host}")
}
