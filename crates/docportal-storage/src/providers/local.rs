//! Local filesystem storage provider.
//!
//! Blobs of a container live as files under `<root>/<container>/`. The declared
//! content type of each blob is kept in a JSON sidecar under
//! `<root>/.meta/<container>/`. Read links are tokens issued by a
//! [`LinkSigner`] and served by the API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_core::traits::clock::{Clock, SystemClock};
use docportal_core::traits::storage::{
    ByteStream, SignedUrlOptions, StorageObjectMeta, StorageProvider,
};

use super::validate_key;
use crate::mime::content_type_for;
use crate::signing::LinkSigner;

/// Directory under the storage root holding per-container sidecars.
const META_DIR: &str = ".meta";

/// Sidecar record stored next to each blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobSidecar {
    content_type: String,
}

/// Local filesystem storage provider bound to one container.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Directory holding the container's blobs.
    root: PathBuf,
    /// Directory holding the container's sidecars.
    meta_root: PathBuf,
    container: String,
    signer: LinkSigner,
    clock: Arc<dyn Clock>,
}

impl LocalStorageProvider {
    /// Create a provider for `container` under `root_path`, creating the directory.
    pub async fn new(root_path: &str, container: &str, signer: LinkSigner) -> AppResult<Self> {
        Self::with_clock(root_path, container, signer, Arc::new(SystemClock)).await
    }

    /// Create a provider whose signed links are timed by `clock`.
    pub async fn with_clock(
        root_path: &str,
        container: &str,
        signer: LinkSigner,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let root = PathBuf::from(root_path).join(container);
        let meta_root = PathBuf::from(root_path).join(META_DIR).join(container);
        for dir in [&root, &meta_root] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create container directory: {}", dir.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            root,
            meta_root,
            container: container.to_string(),
            signer,
            clock,
        })
    }

    /// Resolve a blob key to its file path.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn sidecar_path(&self, key: &str) -> PathBuf {
        self.meta_root.join(format!("{key}.json"))
    }

    /// Declared content type, falling back to the extension guess when the
    /// sidecar is absent or unreadable.
    async fn content_type(&self, key: &str) -> String {
        let declared = match fs::read(self.sidecar_path(key)).await {
            Ok(raw) => match serde_json::from_slice::<BlobSidecar>(&raw) {
                Ok(sidecar) => Some(sidecar.content_type),
                Err(e) => {
                    debug!(container = %self.container, key, error = %e, "Ignoring malformed sidecar");
                    None
                }
            },
            Err(_) => None,
        };
        declared
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| content_type_for(key).to_string())
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn map_io(e: std::io::Error, action: &str, key: &str) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Blob not found: {key}"))
        } else {
            AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {key}"), e)
        }
    }

    async fn to_meta(&self, key: String, meta: &std::fs::Metadata) -> StorageObjectMeta {
        let last_modified = meta.modified().ok().map(DateTime::<Utc>::from);
        StorageObjectMeta {
            content_type: Some(self.content_type(&key).await),
            name: key,
            size_bytes: meta.len(),
            last_modified,
        }
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn container(&self) -> &str {
        &self.container
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn list(&self) -> AppResult<Vec<StorageObjectMeta>> {
        let mut entries = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir_path) = pending.pop() {
            let mut dir = fs::read_dir(&dir_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list container: {}", self.container),
                    e,
                )
            })?;

            while let Some(entry) = dir.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let entry_meta = entry.metadata().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
                })?;

                if entry_meta.is_dir() {
                    pending.push(entry.path());
                    continue;
                }

                let key = entry
                    .path()
                    .strip_prefix(&self.root)
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_else(|_| entry.file_name().to_string_lossy().to_string());
                entries.push(self.to_meta(key, &entry_meta).await);
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(key)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| Self::map_io(e, "get metadata", key))?;
        if meta.is_dir() {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }
        Ok(self.to_meta(key.to_string(), &meta).await)
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(key)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| Self::map_io(e, "open", key))?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(Bytes::from))))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(key)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| Self::map_io(e, "read", key))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {key}"), e)
        })?;

        let sidecar = BlobSidecar {
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| content_type_for(key))
                .to_string(),
        };
        let sidecar_path = self.sidecar_path(key);
        self.ensure_parent(&sidecar_path).await?;
        fs::write(&sidecar_path, serde_json::to_vec(&sidecar)?)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to write blob metadata: {key}"),
                    e,
                )
            })?;

        debug!(
            container = %self.container,
            key,
            bytes = data.len(),
            content_type = %sidecar.content_type,
            "Wrote blob"
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        fs::remove_file(&full_path)
            .await
            .map_err(|e| Self::map_io(e, "delete", key))?;
        match fs::remove_file(self.sidecar_path(key)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                debug!(container = %self.container, key, error = %e, "Failed to remove sidecar");
            }
            _ => {}
        }
        debug!(container = %self.container, key, "Deleted blob");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_path = self.resolve(key)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false) && full_path.is_file())
    }

    async fn signed_url(&self, key: &str, options: &SignedUrlOptions) -> AppResult<String> {
        validate_key(key)?;
        self.signer.sign(&self.container, key, options, self.clock.now())
    }

    fn recognizes_signed_url(&self, url: &str) -> bool {
        self.signer.recognizes(&self.container, url)
    }
}
