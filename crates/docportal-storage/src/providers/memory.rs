//! In-process storage provider backed by a map.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use docportal_core::error::AppError;
use docportal_core::result::AppResult;
use docportal_core::traits::clock::{Clock, SystemClock};
use docportal_core::traits::storage::{
    ByteStream, SignedUrlOptions, StorageObjectMeta, StorageProvider,
};

use super::validate_key;
use crate::mime::content_type_for;
use crate::signing::LinkSigner;

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Storage provider keeping blobs in memory. Contents are lost on drop.
#[derive(Debug, Clone)]
pub struct MemoryStorageProvider {
    container: String,
    blobs: Arc<RwLock<BTreeMap<String, StoredBlob>>>,
    signer: LinkSigner,
    clock: Arc<dyn Clock>,
}

impl MemoryStorageProvider {
    /// Create an empty provider for `container`.
    pub fn new(container: &str, signer: LinkSigner) -> Self {
        Self::with_clock(container, signer, Arc::new(SystemClock))
    }

    /// Create an empty provider stamping writes with `clock`.
    pub fn with_clock(container: &str, signer: LinkSigner, clock: Arc<dyn Clock>) -> Self {
        Self {
            container: container.to_string(),
            blobs: Arc::new(RwLock::new(BTreeMap::new())),
            signer,
            clock,
        }
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the container is empty.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    fn to_meta(key: &str, blob: &StoredBlob) -> StorageObjectMeta {
        StorageObjectMeta {
            name: key.to_string(),
            size_bytes: blob.data.len() as u64,
            content_type: Some(blob.content_type.clone()),
            last_modified: Some(blob.last_modified),
        }
    }

    async fn get(&self, key: &str) -> AppResult<StoredBlob> {
        validate_key(key)?;
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    fn container(&self) -> &str {
        &self.container
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn list(&self) -> AppResult<Vec<StorageObjectMeta>> {
        let blobs = self.blobs.read().await;
        Ok(blobs
            .iter()
            .map(|(key, blob)| Self::to_meta(key, blob))
            .collect())
    }

    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta> {
        let blob = self.get(key).await?;
        Ok(Self::to_meta(key, &blob))
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let blob = self.get(key).await?;
        let chunk: Result<Bytes, std::io::Error> = Ok(blob.data);
        Ok(Box::pin(futures::stream::iter(vec![chunk])))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        Ok(self.get(key).await?.data)
    }

    async fn write(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        validate_key(key)?;
        let blob = StoredBlob {
            data,
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| content_type_for(key))
                .to_string(),
            last_modified: self.clock.now(),
        };
        self.blobs.write().await.insert(key.to_string(), blob);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        validate_key(key)?;
        self.blobs
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        validate_key(key)?;
        Ok(self.blobs.read().await.contains_key(key))
    }

    async fn signed_url(&self, key: &str, options: &SignedUrlOptions) -> AppResult<String> {
        validate_key(key)?;
        self.signer.sign(&self.container, key, options, self.clock.now())
    }

    fn recognizes_signed_url(&self, url: &str) -> bool {
        self.signer.recognizes(&self.container, url)
    }
}
