//! Multipart document upload.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use bytes::Bytes;

use docportal_core::error::AppError;
use docportal_service::document::UploadRequest;

use crate::dto::response::UploadResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/documents/upload
///
/// Fields: `file` (required), `isNewVersion` (`"true"`), `originalFileName`.
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut is_new_version = false;
    let mut original_file_name = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(String::from);
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, content_type, data));
            }
            "isNewVersion" => {
                let text = field.text().await.map_err(multipart_error)?;
                is_new_version = text.trim() == "true";
            }
            "originalFileName" => {
                let text = field.text().await.map_err(multipart_error)?;
                original_file_name = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::validation("No file provided"))?;

    let outcome = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                file_name,
                data,
                content_type,
                is_new_version,
                original_file_name,
            },
        )
        .await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_name: outcome.file_name,
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Upload exceeds the maximum allowed size")
    } else {
        AppError::validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
