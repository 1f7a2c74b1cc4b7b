//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use docportal_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ApiErrorResponse {
    /// Builds an error body.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Handler-facing wrapper that renders an `AppError` as a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type returned by handlers and extractors.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status and error code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        ErrorKind::Storage => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        ErrorKind::Configuration | ErrorKind::Serialization | ErrorKind::Internal => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(err) = self;
        let (status, error_code) = status_for(err.kind);

        if status.is_server_error() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Request failed"
            );
        }

        let body = ApiErrorResponse::new(error_code, err.message);

        (status, Json(body)).into_response()
    }
}
