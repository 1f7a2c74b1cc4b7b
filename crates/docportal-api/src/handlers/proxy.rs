//! Relays remote document bytes through the portal so the viewer can load
//! them from its own origin.

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use docportal_core::error::{AppError, ErrorKind};
use docportal_storage::mime::OCTET_STREAM;

use crate::dto::request::ProxyQuery;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/documents/proxy?url=
pub async fn proxy(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Response> {
    let url = required_url(query)?;
    tracing::debug!(user = %auth.display_name, url = %url, "Proxying document");
    Ok(relay(&state.http_client, &url).await?)
}

/// GET /api/documents/public-proxy?url=
///
/// Only links signed for the document container are relayed.
pub async fn public_proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Response> {
    let url = required_url(query)?;
    let documents = state.storage_manager.documents().await?;
    if !documents.recognizes_signed_url(&url) {
        return Err(AppError::validation(
            "Only signed document links can be proxied",
        )
        .into());
    }
    Ok(relay(&state.http_client, &url).await?)
}

fn required_url(query: ProxyQuery) -> Result<String, AppError> {
    let url = query
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::validation("URL is required"))?;

    match url::Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(AppError::validation("URL must be an absolute http(s) URL")),
    }
}

async fn relay(client: &reqwest::Client, url: &str) -> Result<Response, AppError> {
    let upstream = client.get(url).send().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::ExternalService,
            format!("Failed to fetch document: {e}"),
            e,
        )
    })?;

    let status = upstream.status().as_u16();
    if !(200..300).contains(&status) {
        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        tracing::warn!(url = %url, status, "Upstream rejected proxied request");
        let body = ApiErrorResponse::new(
            "UPSTREAM_ERROR",
            format!("Failed to fetch document: upstream responded with {status}"),
        );
        return Ok((code, Json(body)).into_response());
    }

    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(OCTET_STREAM)
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
