//! Download and share link handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;

use crate::dto::request::{NameQuery, ShareQuery};
use crate::dto::response::{DownloadResponse, ShareResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::request_origin;
use crate::state::AppState;

/// GET /api/documents/download?name=
pub async fn download_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<DownloadResponse>> {
    let name = query.name.unwrap_or_default();
    let url = state.share_service.download_link(&auth, &name).await?;
    Ok(Json(DownloadResponse { url }))
}

/// GET /api/documents/share?name=&expirationDays=
pub async fn share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Query(query): Query<ShareQuery>,
) -> ApiResult<Json<ShareResponse>> {
    let name = query.name.unwrap_or_default();
    let origin = request_origin(&state, &headers);
    let share_url = state
        .share_service
        .share_link(&auth, &name, query.expiration_days, &origin)
        .await?;
    Ok(Json(ShareResponse { share_url }))
}
