//! Short URL handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Redirect;

use docportal_core::error::AppError;
use docportal_service::shortlink::service::public_short_url;

use crate::dto::request::{CreateShortUrlRequest, validated};
use crate::dto::response::{ResolveResponse, ShortUrlResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::request_host;
use crate::state::AppState;

/// POST /api/shorturl/create
pub async fn create_short_url(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<CreateShortUrlRequest>,
) -> ApiResult<Json<ShortUrlResponse>> {
    let req = validated(req)?;
    let record = state
        .short_url_service
        .create(&req.url, req.expiration_days)
        .await?;

    tracing::debug!(user = %auth.display_name, code = %record.short_code, "Short URL issued");

    Ok(Json(ShortUrlResponse {
        short_url: public_short_url(&request_host(&headers), &record.short_code),
        original_url: record.original_url,
    }))
}

/// GET /api/shorturl/{code}
pub async fn resolve_short_url(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<ResolveResponse>> {
    let url = resolve(&state, &code).await?;
    Ok(Json(ResolveResponse { url }))
}

/// GET /s/{code}
pub async fn redirect_short_url(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Redirect> {
    let url = resolve(&state, &code).await?;
    Ok(Redirect::temporary(&url))
}

async fn resolve(state: &AppState, code: &str) -> Result<String, AppError> {
    state
        .short_url_service
        .resolve(code)
        .await?
        .ok_or_else(|| AppError::not_found("URL not found or expired"))
}
