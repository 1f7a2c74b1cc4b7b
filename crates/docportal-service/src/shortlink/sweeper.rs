//! Periodic removal of expired short URLs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::service::ShortUrlService;

/// Runs [`ShortUrlService::sweep_expired`] on a fixed interval.
#[derive(Debug, Clone)]
pub struct ShortUrlSweeper {
    service: Arc<ShortUrlService>,
    interval: Duration,
}

impl ShortUrlSweeper {
    /// Creates a sweeper running every `interval`.
    pub fn new(service: Arc<ShortUrlService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Short URL sweeper started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.service.sweep_expired().await {
                        error!(error = %e, "Short URL sweep failed");
                    }
                }
            }
        }

        info!("Short URL sweeper stopped");
    }

    /// Spawns [`Self::run`] on the runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::Utc;
    use docportal_core::config::ShortUrlConfig;
    use docportal_core::traits::clock::{Clock, ManualClock};
    use docportal_core::traits::storage::StorageProvider;
    use docportal_storage::LinkSigner;
    use docportal_storage::providers::MemoryStorageProvider;

    use super::*;
    use crate::shortlink::ShortUrlRecord;

    #[tokio::test(start_paused = true)]
    async fn test_sweeps_on_interval_and_stops_on_signal() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let storage = Arc::new(MemoryStorageProvider::with_clock(
            "url-shortener",
            LinkSigner::new("s", "http://localhost:8080"),
            clock.clone(),
        ));
        let record = ShortUrlRecord {
            short_code: "old1234".into(),
            original_url: "https://example.com".into(),
            expires_at: clock.now() - chrono::Duration::days(1),
            created_at: clock.now() - chrono::Duration::days(8),
        };
        storage
            .write(
                "old1234",
                Bytes::from(serde_json::to_vec(&record).unwrap()),
                None,
            )
            .await
            .unwrap();

        let service = Arc::new(ShortUrlService::new(
            storage.clone(),
            clock.clone(),
            ShortUrlConfig::default(),
        ));
        let (tx, rx) = watch::channel(false);
        let handle = ShortUrlSweeper::new(service, Duration::from_secs(60)).spawn(rx);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(storage.is_empty().await);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
