//! Time-limited download and share links.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use docportal_core::error::AppError;
use docportal_core::traits::clock::Clock;
use docportal_core::traits::storage::{SignedUrlOptions, StorageProvider};
use docportal_storage::mime::is_pdf;
use docportal_storage::signing::encode_component;

use crate::context::RequestContext;

/// Default share link lifetime in days.
pub const DEFAULT_SHARE_DAYS: u32 = 7;

/// Longest share link lifetime in days.
pub const MAX_SHARE_DAYS: u32 = 7;

/// Issues read links for documents.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Document container.
    storage: Arc<dyn StorageProvider>,
    /// Time source for link validity windows.
    clock: Arc<dyn Clock>,
    /// Lifetime of download links.
    download_ttl: Duration,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        clock: Arc<dyn Clock>,
        download_ttl_minutes: u64,
    ) -> Self {
        Self {
            storage,
            clock,
            download_ttl: Duration::minutes(download_ttl_minutes as i64),
        }
    }

    async fn require_existing(&self, name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if !self.storage.exists(name).await? {
            return Err(AppError::not_found(format!("Document '{name}' not found")));
        }
        Ok(())
    }

    /// Short-lived link for downloading `name`.
    pub async fn download_link(&self, ctx: &RequestContext, name: &str) -> Result<String, AppError> {
        self.require_existing(name).await?;
        let url = self
            .storage
            .signed_url(name, &SignedUrlOptions::expiring_in(self.download_ttl))
            .await?;
        info!(user = %ctx.display_name, name, "Download link issued");
        Ok(url)
    }

    /// Link for sharing `name` outside the portal.
    ///
    /// PDFs are wrapped in the viewer page at `{origin}/shared/view`; other
    /// files get the raw signed link.
    pub async fn share_link(
        &self,
        ctx: &RequestContext,
        name: &str,
        expiration_days: Option<u32>,
        origin: &str,
    ) -> Result<String, AppError> {
        let days = expiration_days.unwrap_or(DEFAULT_SHARE_DAYS);
        if !(1..=MAX_SHARE_DAYS).contains(&days) {
            return Err(AppError::validation(format!(
                "expirationDays must be between 1 and {MAX_SHARE_DAYS}"
            )));
        }
        self.require_existing(name).await?;

        let options = SignedUrlOptions {
            expires_in: Duration::days(days as i64),
            starts_at: Some(self.clock.now() - Duration::minutes(1)),
            content_disposition: Some(format!("inline; filename=\"{}\"", name.replace('"', ""))),
        };
        let signed = self.storage.signed_url(name, &options).await?;

        let share_url = if is_pdf(name) {
            format!(
                "{}/shared/view?url={}&name={}",
                origin.trim_end_matches('/'),
                encode_component(&signed),
                encode_component(name)
            )
        } else {
            signed
        };

        info!(user = %ctx.display_name, name, days, "Share link issued");
        Ok(share_url)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use docportal_core::error::ErrorKind;
    use docportal_core::traits::clock::SystemClock;
    use docportal_storage::LinkSigner;
    use docportal_storage::providers::MemoryStorageProvider;

    use super::*;

    async fn setup() -> ShareService {
        let storage = Arc::new(MemoryStorageProvider::new(
            "documents",
            LinkSigner::new("s", "http://localhost:8080"),
        ));
        storage.write("q1.pdf", Bytes::from("pdf"), None).await.unwrap();
        storage.write("q1.xlsx", Bytes::from("xls"), None).await.unwrap();
        ShareService::new(storage, Arc::new(SystemClock), 15)
    }

    #[tokio::test]
    async fn test_pdf_share_goes_through_viewer() {
        let service = setup().await;
        let ctx = RequestContext::system();

        let url = service
            .share_link(&ctx, "q1.pdf", None, "https://portal.example.com/")
            .await
            .unwrap();
        assert!(url.starts_with("https://portal.example.com/shared/view?url=http%3A%2F%2Flocalhost%3A8080%2Fblobs%2Fdocuments%2Fq1.pdf%3Ftoken%3D"));
        assert!(url.ends_with("&name=q1.pdf"));
    }

    #[tokio::test]
    async fn test_other_files_get_raw_link() {
        let service = setup().await;
        let ctx = RequestContext::system();

        let url = service
            .share_link(&ctx, "q1.xlsx", Some(3), "https://portal.example.com")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:8080/blobs/documents/q1.xlsx?token="));
    }

    #[tokio::test]
    async fn test_share_validation() {
        let service = setup().await;
        let ctx = RequestContext::system();

        let err = service
            .share_link(&ctx, "q1.pdf", Some(8), "https://x")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .share_link(&ctx, "missing.pdf", None, "https://x")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_download_link() {
        let service = setup().await;
        let ctx = RequestContext::system();

        let url = service.download_link(&ctx, "q1.pdf").await.unwrap();
        assert!(url.contains("/blobs/documents/q1.pdf?token="));
        assert!(service.download_link(&ctx, "").await.is_err());
    }
}
