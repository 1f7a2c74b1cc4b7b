//! Creating, resolving, and expiring short URLs.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Duration;
use tracing::{debug, info, warn};

use docportal_core::config::ShortUrlConfig;
use docportal_core::error::AppError;
use docportal_core::traits::clock::Clock;
use docportal_core::traits::storage::StorageProvider;

use super::code::{generate_code, is_well_formed};
use super::record::ShortUrlRecord;

/// Longest lifetime a short URL can be created with.
pub const MAX_EXPIRATION_DAYS: u32 = 3650;

/// Short URL generator and resolver backed by the side container.
#[derive(Debug, Clone)]
pub struct ShortUrlService {
    /// Side container; one JSON blob per code.
    storage: Arc<dyn StorageProvider>,
    /// Time source for expiry.
    clock: Arc<dyn Clock>,
    /// Code length, default lifetime, retry bound.
    config: ShortUrlConfig,
}

impl ShortUrlService {
    /// Creates a new short URL service.
    pub fn new(storage: Arc<dyn StorageProvider>, clock: Arc<dyn Clock>, config: ShortUrlConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    /// Stores a new mapping for `original_url` and returns it.
    ///
    /// A freshly generated code that is held by a live record is discarded
    /// and another one drawn, up to `max_generation_attempts` times.
    pub async fn create(
        &self,
        original_url: &str,
        expiration_days: Option<u32>,
    ) -> Result<ShortUrlRecord, AppError> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(AppError::validation("URL is required"));
        }
        match url::Url::parse(original_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => return Err(AppError::validation("URL must be an absolute http(s) URL")),
        }

        let days = expiration_days.unwrap_or(self.config.default_expiration_days);
        if days == 0 {
            return Err(AppError::validation("expirationDays must be at least 1"));
        }
        if days > MAX_EXPIRATION_DAYS {
            return Err(AppError::validation(format!(
                "expirationDays must be at most {MAX_EXPIRATION_DAYS}"
            )));
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| AppError::validation("expirationDays is out of range"))?;

        let code = self.free_code().await?;
        let record = ShortUrlRecord {
            short_code: code,
            original_url: original_url.to_string(),
            expires_at,
            created_at: now,
        };

        let body = serde_json::to_vec(&record)?;
        self.storage
            .write(&record.short_code, Bytes::from(body), Some("application/json"))
            .await?;

        info!(
            code = %record.short_code,
            expires_at = %record.expires_at,
            "Short URL created"
        );
        Ok(record)
    }

    async fn free_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.config.max_generation_attempts {
            let code = generate_code(self.config.code_length);
            if self.load_live(&code).await?.is_none() {
                return Ok(code);
            }
            debug!(attempt, code = %code, "Short code collision");
        }
        Err(AppError::storage(format!(
            "No free short code after {} attempts",
            self.config.max_generation_attempts
        )))
    }

    /// Target URL of `code`, or `None` when unknown or expired.
    ///
    /// Reading an expired record deletes it.
    pub async fn resolve(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self.load_live(code).await?.map(|record| record.original_url))
    }

    /// Live record for `code`; expired records are removed on the way.
    async fn load_live(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        if !is_well_formed(code) {
            return Ok(None);
        }

        let Some(record) = self.load(code).await? else {
            return Ok(None);
        };

        if record.is_expired(self.clock.now()) {
            self.remove(code).await?;
            info!(code, "Expired short URL removed on read");
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn load(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let body = match self.storage.read_bytes(code).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<ShortUrlRecord>(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(code, error = %e, "Ignoring malformed short URL record");
                Ok(None)
            }
        }
    }

    async fn remove(&self, code: &str) -> Result<(), AppError> {
        match self.storage.delete(code).await {
            Err(e) if !e.is_not_found() => Err(e),
            _ => Ok(()),
        }
    }

    /// Deletes every expired record and returns how many were removed.
    ///
    /// Records that cannot be read or removed are logged and skipped.
    pub async fn sweep_expired(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let mut removed = 0;

        for entry in self.storage.list().await? {
            let record = match self.load(&entry.name).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!(code = %entry.name, error = %e, "Skipping unreadable short URL record");
                    continue;
                }
            };
            if !record.is_expired(now) {
                continue;
            }
            match self.remove(&entry.name).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(code = %entry.name, error = %e, "Failed to remove expired short URL"),
            }
        }

        if removed > 0 {
            info!(removed, "Expired short URLs swept");
        }
        Ok(removed)
    }
}

/// Public link for `code`: `http` when the host is local, `https` otherwise.
pub fn public_short_url(host: &str, code: &str) -> String {
    let scheme = if host.contains("localhost") { "http" } else { "https" };
    format!("{scheme}://{host}/s/{code}")
}
