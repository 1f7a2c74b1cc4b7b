//! Views derived from a container listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored version of a logical document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    /// Token from the blob name, or `"original"`.
    #[serde(rename = "id")]
    pub version_id: String,
    /// Full blob name.
    pub file_name: String,
    /// Base name plus extension.
    pub original_name: String,
    /// Last-modified time of the blob.
    pub uploaded_at: DateTime<Utc>,
    /// Human-readable size.
    pub size: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// 1-based position in upload order; the newest version has the highest number.
    pub version_number: u32,
}

/// A logical document and its version chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentGroup {
    /// Base name shared by all versions.
    pub document_id: String,
    /// Name of the latest version without its tag.
    pub original_name: String,
    /// Versions, newest first. Never empty.
    pub versions: Vec<DocumentVersion>,
}

impl DocumentGroup {
    /// The most recently uploaded version.
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions.first()
    }
}

/// A row of the document listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListItem {
    /// Blob name (doubles as the row id).
    pub id: String,
    /// Blob name.
    pub name: String,
    /// Last-modified time of the blob.
    pub uploaded_at: DateTime<Utc>,
    /// MIME type derived from the extension.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Human-readable size.
    pub size: String,
    /// Whether the document has more than one version.
    pub has_versions: bool,
    /// Version number of this row.
    pub version_number: u32,
    /// Number of versions of the document.
    pub total_versions: u32,
    /// Base name plus extension.
    pub original_name: String,
}

impl DocumentListItem {
    pub(crate) fn from_version(
        version: &DocumentVersion,
        total_versions: usize,
        original_name: &str,
    ) -> Self {
        Self {
            id: version.file_name.clone(),
            name: version.file_name.clone(),
            uploaded_at: version.uploaded_at,
            content_type: docportal_storage::mime::content_type_for(&version.file_name).to_string(),
            size: version.size.clone(),
            has_versions: total_versions > 1,
            version_number: version.version_number,
            total_versions: total_versions as u32,
            original_name: original_name.to_string(),
        }
    }
}

/// Result of deleting one blob in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Blob name.
    pub name: String,
    /// Whether the blob was deleted.
    pub deleted: bool,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
