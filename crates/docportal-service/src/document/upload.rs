//! Document upload with size limits and name-collision handling.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use docportal_core::config::{CollisionMode, UploadConfig};
use docportal_core::error::AppError;
use docportal_core::traits::clock::Clock;
use docportal_core::traits::storage::StorageProvider;
use docportal_storage::mime::content_type_for;

use super::naming::{generate_version_id, make_versioned, parse};
use crate::context::RequestContext;

/// Attempts at finding a free versioned name within one millisecond.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// An incoming upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name of the uploaded file.
    pub file_name: String,
    /// File contents.
    pub data: Bytes,
    /// Content type declared by the client.
    pub content_type: Option<String>,
    /// Whether this upload is a new version of `original_file_name`.
    pub is_new_version: bool,
    /// Document the new version belongs to.
    pub original_file_name: Option<String>,
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Blob name the file was stored under.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Whether the stored name differs from the uploaded one.
    pub renamed: bool,
}

/// Stores uploaded files in the document container.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Document container.
    storage: Arc<dyn StorageProvider>,
    /// Time source for version tokens.
    clock: Arc<dyn Clock>,
    /// Upload limits and collision policy.
    config: UploadConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(storage: Arc<dyn StorageProvider>, clock: Arc<dyn Clock>, config: UploadConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    /// Largest accepted file in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.config.max_upload_size_bytes
    }

    /// Stores an upload, picking a name that never overwrites an existing blob.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> Result<UploadOutcome, AppError> {
        let file_name = req.file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("No file provided"));
        }
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(AppError::validation("File name must not contain path separators"));
        }

        let size = req.data.len() as u64;
        if size > self.config.max_upload_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "File is {size} bytes; the limit is {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let original = req
            .original_file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let target = if req.is_new_version && let Some(original) = original {
            self.next_version_name(original).await?
        } else if !self.storage.exists(file_name).await? {
            file_name.to_string()
        } else {
            match self.config.collision_mode {
                CollisionMode::Version => self.next_version_name(file_name).await?,
                CollisionMode::Timestamp => self.timestamped_name(file_name),
            }
        };

        let content_type = req
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
            .unwrap_or_else(|| content_type_for(&target));

        self.storage
            .write(&target, req.data, Some(content_type))
            .await?;

        info!(
            user = %ctx.display_name,
            file_name = %target,
            bytes = size,
            new_version = req.is_new_version,
            "Document uploaded"
        );

        Ok(UploadOutcome {
            renamed: target != file_name,
            file_name: target,
            size_bytes: size,
        })
    }

    /// First free `<base>_v_<token><ext>` name for a new version of `name`.
    async fn next_version_name(&self, name: &str) -> Result<String, AppError> {
        let version = generate_version_id(self.clock.now());
        let mut candidate = make_versioned(name, &version);
        let mut attempt = 0;
        while self.storage.exists(&candidate).await? {
            attempt += 1;
            if attempt > MAX_NAME_ATTEMPTS {
                return Err(AppError::conflict(format!(
                    "No free version name for '{name}'"
                )));
            }
            candidate = make_versioned(name, &version.with_suffix(attempt));
        }
        Ok(candidate)
    }

    /// `<stem>_<unix-millis><ext>`.
    fn timestamped_name(&self, name: &str) -> String {
        let parsed = parse(name);
        let stem = match &parsed.version_id {
            Some(version) => format!("{}_v_{}", parsed.base_name, version),
            None => parsed.base_name.clone(),
        };
        format!(
            "{}_{}{}",
            stem,
            self.clock.now().timestamp_millis(),
            parsed.extension
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use docportal_core::error::ErrorKind;
    use docportal_core::traits::clock::ManualClock;
    use docportal_storage::LinkSigner;
    use docportal_storage::providers::MemoryStorageProvider;

    use super::*;
    use crate::document::naming;

    fn setup(mode: CollisionMode) -> (UploadService, Arc<MemoryStorageProvider>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap(),
        ));
        let storage = Arc::new(MemoryStorageProvider::with_clock(
            "documents",
            LinkSigner::new("s", "http://localhost:8080"),
            clock.clone(),
        ));
        let config = UploadConfig {
            max_upload_size_bytes: 16,
            collision_mode: mode,
        };
        (
            UploadService::new(storage.clone(), clock.clone(), config),
            storage,
            clock,
        )
    }

    fn request(name: &str) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            data: Bytes::from_static(b"%PDF-1.7"),
            content_type: Some("application/pdf".into()),
            is_new_version: false,
            original_file_name: None,
        }
    }

    #[tokio::test]
    async fn test_second_upload_becomes_a_version() {
        let (service, storage, clock) = setup(CollisionMode::Version);
        let ctx = RequestContext::system();

        let first = service.upload(&ctx, request("report.pdf")).await.unwrap();
        assert_eq!(first.file_name, "report.pdf");
        assert!(!first.renamed);

        clock.advance(chrono::Duration::seconds(1));
        let second = service.upload(&ctx, request("report.pdf")).await.unwrap();
        assert!(second.renamed);
        assert_eq!(second.file_name, "report_v_2024-03-05T10-20-31-000Z.pdf");

        let parsed = naming::parse(&second.file_name);
        assert_eq!(parsed.base_name, "report");
        assert_eq!(storage.len().await, 2);
    }

    #[tokio::test]
    async fn test_same_instant_uploads_do_not_overwrite() {
        let (service, storage, _) = setup(CollisionMode::Version);
        let ctx = RequestContext::system();

        for _ in 0..3 {
            service.upload(&ctx, request("report.pdf")).await.unwrap();
        }
        assert_eq!(storage.len().await, 3);
        assert!(storage
            .exists("report_v_2024-03-05T10-20-30-000Z-1.pdf")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_explicit_new_version() {
        let (service, _, _) = setup(CollisionMode::Version);
        let ctx = RequestContext::system();

        let mut req = request("scan-from-phone.pdf");
        req.is_new_version = true;
        req.original_file_name = Some("contract.pdf".into());

        let outcome = service.upload(&ctx, req).await.unwrap();
        assert_eq!(outcome.file_name, "contract_v_2024-03-05T10-20-30-000Z.pdf");
    }

    #[tokio::test]
    async fn test_timestamp_collision_mode() {
        let (service, _, clock) = setup(CollisionMode::Timestamp);
        let ctx = RequestContext::system();

        service.upload(&ctx, request("report.pdf")).await.unwrap();
        let second = service.upload(&ctx, request("report.pdf")).await.unwrap();
        assert_eq!(
            second.file_name,
            format!("report_{}.pdf", clock.now().timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_rejects_oversized_and_unnamed() {
        let (service, storage, _) = setup(CollisionMode::Version);
        let ctx = RequestContext::system();

        let mut big = request("big.pdf");
        big.data = Bytes::from(vec![0u8; 17]);
        let err = service.upload(&ctx, big).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

        let err = service.upload(&ctx, request("  ")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_content_type_falls_back_to_extension() {
        let (service, storage, _) = setup(CollisionMode::Version);
        let ctx = RequestContext::system();

        let mut req = request("sheet.csv");
        req.content_type = None;
        service.upload(&ctx, req).await.unwrap();

        let meta = storage.metadata("sheet.csv").await.unwrap();
        assert_eq!(meta.content_type.as_deref(), Some("text/csv"));
    }
}
