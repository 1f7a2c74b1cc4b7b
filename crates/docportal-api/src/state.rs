//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;

use docportal_auth::JwtDecoder;
use docportal_core::config::AppConfig;
use docportal_core::result::AppResult;
use docportal_core::traits::clock::Clock;
use docportal_service::{DocumentService, ShareService, ShortUrlService, UploadService};
use docportal_storage::{LinkSigner, StorageManager};

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped or cheaply cloneable.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Core ─────────────────────────────────────────────────────
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Time source shared with the services.
    pub clock: Arc<dyn Clock>,

    // ── Storage ──────────────────────────────────────────────────
    /// Container name → provider.
    pub storage_manager: Arc<StorageManager>,
    /// Verifies link tokens presented to `/blobs`.
    pub link_signer: LinkSigner,

    // ── Auth ─────────────────────────────────────────────────────
    /// Session token verifier.
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────────
    /// Document listing, versions, and deletion.
    pub document_service: Arc<DocumentService>,
    /// Document uploads.
    pub upload_service: Arc<UploadService>,
    /// Download and share links.
    pub share_service: Arc<ShareService>,
    /// Short URL creation and resolution.
    pub short_url_service: Arc<ShortUrlService>,

    // ── Outbound ─────────────────────────────────────────────────
    /// Client used by the document proxy.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Wires services over the containers registered in `storage_manager`.
    pub async fn build(
        config: AppConfig,
        storage_manager: Arc<StorageManager>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let documents = storage_manager.documents().await?;
        let short_urls = storage_manager.short_urls().await?;

        let link_signer = LinkSigner::new(
            &config.storage.signing_secret,
            &link_base_url(&config),
        );
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let document_service = Arc::new(DocumentService::new(documents.clone(), clock.clone()));
        let upload_service = Arc::new(UploadService::new(
            documents.clone(),
            clock.clone(),
            config.upload.clone(),
        ));
        let share_service = Arc::new(ShareService::new(
            documents,
            clock.clone(),
            config.storage.download_link_ttl_minutes,
        ));
        let short_url_service = Arc::new(ShortUrlService::new(
            short_urls,
            clock.clone(),
            config.short_url.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            clock,
            storage_manager,
            link_signer,
            jwt_decoder,
            document_service,
            upload_service,
            share_service,
            short_url_service,
            http_client: reqwest::Client::new(),
        })
    }
}

/// Base URL that roots links served by this process.
///
/// Falls back to `http://localhost:{port}` when no public URL is configured.
pub fn link_base_url(config: &AppConfig) -> String {
    let configured = config.server.public_base_url.trim_end_matches('/');
    if configured.is_empty() {
        format!("http://localhost:{}", config.server.port)
    } else {
        configured.to_string()
    }
}
