//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docportal_service::document::{DeleteOutcome, DocumentVersion};

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Result of an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Outcome message.
    pub message: String,
    /// Name the blob was stored under.
    pub file_name: String,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    /// Summary message.
    pub message: String,
    /// Per-name outcome, in request order.
    pub results: Vec<DeleteOutcome>,
}

/// Signed download link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// Signed URL.
    pub url: String,
}

/// Share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Viewer URL for PDFs, raw signed URL otherwise.
    pub share_url: String,
}

/// One row of a version chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// Blob name.
    pub file_name: String,
    /// Dense version number, newest highest.
    pub version_number: u32,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Human-readable size.
    pub size: String,
}

impl From<DocumentVersion> for VersionSummary {
    fn from(v: DocumentVersion) -> Self {
        Self {
            file_name: v.file_name,
            version_number: v.version_number,
            uploaded_at: v.uploaded_at,
            size: v.size,
        }
    }
}

/// Version chain of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsResponse {
    /// Newest first.
    pub versions: Vec<VersionSummary>,
    /// Number of versions.
    pub total_versions: usize,
}

/// A newly created short URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlResponse {
    /// Public short link.
    pub short_url: String,
    /// Target URL.
    pub original_url: String,
}

/// A resolved short URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Target URL.
    pub url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every container answers, `degraded` otherwise.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Container name → reachable.
    pub storage: BTreeMap<String, bool>,
}

/// A blob in the debug listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugBlob {
    /// Blob name.
    pub name: String,
    /// Stored content type.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub content_length: u64,
}

/// Debug listing of the document container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugListResponse {
    /// Always true when the listing succeeded.
    pub success: bool,
    /// Whether the container answered a health probe.
    pub container_exists: bool,
    /// Number of blobs seen.
    pub total_blobs_scanned: usize,
    /// The first blobs of the listing.
    pub blobs: Vec<DebugBlob>,
}
