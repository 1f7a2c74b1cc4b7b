//! S3-compatible object storage provider (requires the `s3` feature).
//!
//! Each container maps to a bucket named `{bucket_prefix}{container}`. Read
//! links are SigV4 presigned GET requests.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as S3ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use docportal_core::config::S3StorageConfig;
use docportal_core::error::AppError;
use docportal_core::result::AppResult;
use docportal_core::traits::storage::{
    ByteStream, SignedUrlOptions, StorageObjectMeta, StorageProvider,
};

use super::validate_key;

/// Longest lifetime SigV4 allows for a presigned request.
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// S3-compatible storage provider bound to one bucket.
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: S3Client,
    container: String,
    bucket: String,
    endpoint_host: Option<String>,
}

impl S3StorageProvider {
    /// Create a provider for `container` using the given connection settings.
    pub async fn new(config: &S3StorageConfig, container: &str) -> AppResult<Self> {
        let bucket = format!("{}{}", config.bucket_prefix, container);
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %bucket,
            "Initializing S3 storage provider"
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "docportal",
            ));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }

        let endpoint_host = url::Url::parse(&config.endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            container: container.to_string(),
            bucket,
            endpoint_host,
        })
    }

    fn storage_error(action: &str, key: &str, err: impl std::error::Error) -> AppError {
        AppError::storage(format!(
            "S3 {action} failed for '{key}': {}",
            DisplayErrorContext(err)
        ))
    }

    fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
    }
}

/// Validate a presigned URL lifetime.
fn validate_expiry(expires_in: Duration) -> AppResult<()> {
    if expires_in.is_zero() {
        return Err(AppError::validation("Link lifetime must be greater than zero"));
    }
    if expires_in > MAX_PRESIGN_EXPIRY {
        return Err(AppError::validation(format!(
            "Link lifetime {}s exceeds the maximum of {}s",
            expires_in.as_secs(),
            MAX_PRESIGN_EXPIRY.as_secs()
        )));
    }
    Ok(())
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    fn container(&self) -> &str {
        &self.container
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn list(&self) -> AppResult<Vec<StorageObjectMeta>> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| Self::storage_error("list", &self.bucket, e))?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                entries.push(StorageObjectMeta {
                    name: key.to_string(),
                    size_bytes: object.size().unwrap_or_default().max(0) as u64,
                    content_type: None,
                    last_modified: object.last_modified().and_then(Self::to_chrono),
                });
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!(bucket = %self.bucket, count = entries.len(), "Listed bucket");
        Ok(entries)
    }

    async fn metadata(&self, key: &str) -> AppResult<StorageObjectMeta> {
        validate_key(key)?;
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_not_found() {
                    AppError::not_found(format!("Blob not found: {key}"))
                } else {
                    Self::storage_error("head", key, service)
                }
            })?;

        Ok(StorageObjectMeta {
            name: key.to_string(),
            size_bytes: output.content_length().unwrap_or_default().max(0) as u64,
            content_type: output.content_type().map(str::to_string),
            last_modified: output.last_modified().and_then(Self::to_chrono),
        })
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        validate_key(key)?;
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_no_such_key() {
                    AppError::not_found(format!("Blob not found: {key}"))
                } else {
                    Self::storage_error("get", key, service)
                }
            })?;

        let stream = ReaderStream::new(output.body.into_async_read());
        Ok(Box::pin(stream.map(|r| r.map(Bytes::from))))
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        validate_key(key)?;
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_no_such_key() {
                    AppError::not_found(format!("Blob not found: {key}"))
                } else {
                    Self::storage_error("get", key, service)
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Self::storage_error("read body", key, e))?;
        Ok(data.into_bytes())
    }

    async fn write(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        validate_key(key)?;
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(S3ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Self::storage_error("put", key, e))?;

        debug!(bucket = %self.bucket, key, bytes = size, "Wrote blob");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        // DeleteObject succeeds for absent keys, so look first.
        if !self.exists(key).await? {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::storage_error("delete", key, e))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self.metadata(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn signed_url(&self, key: &str, options: &SignedUrlOptions) -> AppResult<String> {
        validate_key(key)?;
        let expires_in = options
            .expires_in
            .to_std()
            .map_err(|_| AppError::validation("Link lifetime must be positive"))?;
        validate_expiry(expires_in)?;

        let mut presign = PresigningConfig::builder().expires_in(expires_in);
        if let Some(start) = options.starts_at {
            presign = presign.start_time(SystemTime::from(start));
        }
        let presign = presign
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build presigning config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .set_response_content_disposition(options.content_disposition.clone())
            .presigned(presign)
            .await
            .map_err(|e| Self::storage_error("presign", key, e))?;

        Ok(presigned.uri().to_string())
    }

    fn recognizes_signed_url(&self, url: &str) -> bool {
        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        let host_matches = match &self.endpoint_host {
            Some(endpoint) => host == endpoint.as_str() || host.ends_with(&format!(".{endpoint}")),
            None => host.ends_with(".amazonaws.com"),
        };
        let virtual_hosted = host.starts_with(&format!("{}.", self.bucket));
        let path_style = parsed.path().starts_with(&format!("/{}/", self.bucket));

        host_matches
            && (virtual_hosted || path_style)
            && parsed.query_pairs().any(|(k, _)| k == "X-Amz-Signature")
    }
}
