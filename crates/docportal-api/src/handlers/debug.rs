//! Diagnostics for the document container. Mounted only when
//! `server.debug_endpoints` is enabled.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DebugBlob, DebugListResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

const SAMPLE_SIZE: usize = 10;

/// GET /api/debug/list-blobs
pub async fn list_blobs(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<DebugListResponse>> {
    let documents = state.storage_manager.documents().await?;
    let container_exists = documents.health_check().await.unwrap_or(false);
    let (sample, total) = state.document_service.sample(SAMPLE_SIZE).await?;

    Ok(Json(DebugListResponse {
        success: true,
        container_exists,
        total_blobs_scanned: total,
        blobs: sample
            .into_iter()
            .map(|m| DebugBlob {
                name: m.name,
                content_type: m.content_type,
                content_length: m.size_bytes,
            })
            .collect(),
    }))
}
