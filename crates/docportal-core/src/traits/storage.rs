//! Storage provider trait for pluggable blob storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Key of the blob within its container.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Content type recorded at upload time (if known).
    pub content_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parameters of a time-limited read link.
#[derive(Debug, Clone)]
pub struct SignedUrlOptions {
    /// How long the link stays valid, measured from now.
    pub expires_in: Duration,
    /// Backdated start of validity to absorb clock skew.
    pub starts_at: Option<DateTime<Utc>>,
    /// `Content-Disposition` the store should answer with.
    pub content_disposition: Option<String>,
}

impl SignedUrlOptions {
    /// A plain read link valid for `expires_in`.
    pub fn expiring_in(expires_in: Duration) -> Self {
        Self {
            expires_in,
            starts_at: None,
            content_disposition: None,
        }
    }
}

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// A single blob container in an object store.
///
/// The namespace is flat: keys are opaque strings. Implementations exist for
/// the local filesystem, an in-memory map, and S3 (feature `s3`), all in
/// `docportal-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Name of the container this provider is bound to.
    fn container(&self) -> &str;

    /// Check whether the container is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// List every blob in the container.
    async fn list(&self) -> AppResult<Vec<StorageObjectMeta>>;

    /// Get metadata of one blob. Fails with `NotFound` when absent.
    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta>;

    /// Read a blob as a byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Read a blob into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write (create or overwrite) a blob.
    async fn write(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()>;

    /// Delete a blob. Fails with `NotFound` when absent.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Generate a credential-less, time-limited read link for a blob.
    async fn signed_url(&self, key: &str, options: &SignedUrlOptions) -> AppResult<String>;

    /// Whether `url` looks like a read link this provider issued.
    fn recognizes_signed_url(&self, url: &str) -> bool;
}
