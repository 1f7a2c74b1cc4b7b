//! Document listing, version chain, and delete handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use docportal_core::error::AppError;
use docportal_service::document::DocumentListItem;

use crate::dto::request::{BulkDeleteRequest, ListDocumentsQuery, NameQuery, VersionsQuery, validated};
use crate::dto::response::{BulkDeleteResponse, MessageResponse, VersionSummary, VersionsResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/documents?includeVersions=
pub async fn list_documents(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListDocumentsQuery>,
) -> ApiResult<Json<Vec<DocumentListItem>>> {
    let items = state
        .document_service
        .list(query.include_versions.unwrap_or(false))
        .await?;
    Ok(Json(items))
}

/// GET /api/documents/versions?baseName=
pub async fn list_versions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<VersionsQuery>,
) -> ApiResult<Json<VersionsResponse>> {
    let base_name = query.base_name.unwrap_or_default();
    let versions = state.document_service.versions(base_name.trim()).await?;

    Ok(Json(VersionsResponse {
        total_versions: versions.len(),
        versions: versions.into_iter().map(VersionSummary::from).collect(),
    }))
}

/// DELETE /api/documents/delete?name= or with a `{names}` body
///
/// A single name answers 404 when the blob is absent. A batch answers 200
/// when every deletion succeeded and 207 otherwise.
pub async fn delete_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NameQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    if let Some(name) = query.name.filter(|n| !n.is_empty()) {
        state.document_service.delete(&auth, &name).await?;
        let response = MessageResponse {
            message: format!("Document \"{name}\" deleted successfully"),
        };
        let json = serde_json::to_value(response).map_err(AppError::from)?;
        return Ok((StatusCode::OK, Json(json)));
    }

    if body.is_empty() {
        return Err(AppError::validation("Document name or names are required").into());
    }
    let req: BulkDeleteRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;
    let req = validated(req)?;

    let results = state.document_service.delete_many(&auth, &req.names).await;
    let all_deleted = results.iter().all(|r| r.deleted);

    let (status, message) = if all_deleted {
        (
            StatusCode::OK,
            format!("All {} documents deleted successfully", results.len()),
        )
    } else {
        (
            StatusCode::MULTI_STATUS,
            "Some documents could not be deleted".to_string(),
        )
    };

    let response = BulkDeleteResponse { message, results };
    let json = serde_json::to_value(response).map_err(AppError::from)?;
    Ok((status, Json(json)))
}
