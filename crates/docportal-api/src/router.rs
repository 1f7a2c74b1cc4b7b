//! Route definitions for the DocPortal HTTP API.
//!
//! JSON routes are mounted under `/api`. Short-link redirects and signed
//! blob links live at the root so the URLs handed out stay short.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.upload.max_upload_size_bytes as usize + MULTIPART_OVERHEAD_BYTES;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let mut api_routes = Router::new()
        .merge(document_routes())
        .merge(short_url_routes())
        .merge(health_routes());

    if state.config.server.debug_endpoints {
        api_routes = api_routes.merge(debug_routes());
    }

    let root_routes = Router::new()
        .route("/s/{code}", get(handlers::shorturl::redirect_short_url))
        .route("/blobs/{container}/{*key}", get(handlers::blob::serve_blob));

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(root_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging));

    middleware::security::with_security_headers(router).with_state(state)
}

/// Document listing, upload, delete, links, and proxies
fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(handlers::document::list_documents))
        .route("/documents/upload", post(handlers::upload::upload_document))
        .route("/documents/delete", delete(handlers::document::delete_documents))
        .route("/documents/download", get(handlers::share::download_link))
        .route("/documents/share", get(handlers::share::share_link))
        .route("/documents/versions", get(handlers::document::list_versions))
        .route("/documents/proxy", get(handlers::proxy::proxy))
        .route("/documents/public-proxy", get(handlers::proxy::public_proxy))
}

/// Short URL creation and lookup
fn short_url_routes() -> Router<AppState> {
    Router::new()
        .route("/shorturl/create", post(handlers::shorturl::create_short_url))
        .route("/shorturl/{code}", get(handlers::shorturl::resolve_short_url))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Container diagnostics
fn debug_routes() -> Router<AppState> {
    Router::new().route("/debug/list-blobs", get(handlers::debug::list_blobs))
}
