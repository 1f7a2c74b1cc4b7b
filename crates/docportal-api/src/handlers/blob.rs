//! Serves signed links issued by providers without native presigning.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use docportal_core::error::AppError;
use docportal_storage::mime::OCTET_STREAM;

use crate::dto::request::BlobQuery;
use crate::error::ApiResult;
use crate::extractors::RequestMeta;
use crate::state::AppState;

/// GET /blobs/{container}/{*key}?token=
pub async fn serve_blob(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path((container, key)): Path<(String, String)>,
    Query(query): Query<BlobQuery>,
) -> ApiResult<Response> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Link token is required"))?;

    let claims = state.link_signer.verify(&container, &key, &token)?;

    let provider = state.storage_manager.get(&container).await?;
    let object = provider.metadata(&key).await?;
    let stream = provider.read(&key).await?;

    tracing::debug!(
        container = %container,
        key = %key,
        ip = %meta.ip_address,
        "Serving signed blob"
    );

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            object.content_type.as_deref().unwrap_or(OCTET_STREAM),
        )
        .header(header::CONTENT_LENGTH, object.size_bytes)
        .header(header::CACHE_CONTROL, "private, no-store");

    if let Some(disposition) = claims.disp.as_deref() {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}
