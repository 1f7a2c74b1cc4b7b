//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use docportal_core::error::AppError;

/// Query of `GET /api/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    /// Return every version instead of the latest per document.
    #[serde(default)]
    pub include_versions: Option<bool>,
}

/// Query carrying a single blob name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameQuery {
    /// Blob name.
    pub name: Option<String>,
}

/// Body of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    /// Blob names to delete.
    #[validate(length(min = 1, message = "At least one name is required"))]
    pub names: Vec<String>,
}

/// Query of `GET /api/documents/share`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareQuery {
    /// Blob name.
    pub name: Option<String>,
    /// Link lifetime in days.
    pub expiration_days: Option<u32>,
}

/// Query of `GET /api/documents/versions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsQuery {
    /// Logical document name.
    pub base_name: Option<String>,
}

/// Query of the document proxies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyQuery {
    /// Absolute URL to fetch.
    pub url: Option<String>,
}

/// Body of `POST /api/shorturl/create`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlRequest {
    /// Target URL.
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
    /// Record lifetime in days.
    #[serde(default)]
    #[validate(range(min = 1, max = 3650, message = "expirationDays must be between 1 and 3650"))]
    pub expiration_days: Option<u32>,
}

/// Query of a signed blob link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobQuery {
    /// Link token.
    pub token: Option<String>,
}

/// Runs `validate` and folds the first failure into a validation error.
pub fn validated<T: Validate>(value: T) -> Result<T, AppError> {
    value
        .validate()
        .map_err(|errors| AppError::validation(first_message(&errors)))?;
    Ok(value)
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_reports_message() {
        let req: CreateShortUrlRequest = serde_json::from_str("{}").unwrap();
        let err = validated(req).unwrap_err();
        assert_eq!(err.message, "URL is required");
    }

    #[test]
    fn test_expiration_bounds() {
        let req: CreateShortUrlRequest =
            serde_json::from_str(r#"{"url":"https://a.example","expirationDays":0}"#).unwrap();
        let err = validated(req).unwrap_err();
        assert_eq!(err.message, "expirationDays must be between 1 and 3650");

        let req: CreateShortUrlRequest =
            serde_json::from_str(r#"{"url":"https://a.example","expirationDays":4294967295}"#)
                .unwrap();
        assert!(validated(req).is_err());

        let req: CreateShortUrlRequest =
            serde_json::from_str(r#"{"url":"https://a.example","expirationDays":3650}"#).unwrap();
        assert!(validated(req).is_ok());
    }

    #[test]
    fn test_empty_bulk_delete_rejected() {
        let req: BulkDeleteRequest = serde_json::from_str(r#"{"names":[]}"#).unwrap();
        assert!(validated(req).is_err());
    }
}
