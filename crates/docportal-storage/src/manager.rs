//! Storage manager routing operations to the provider bound to each container.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use docportal_core::config::StorageConfig;
use docportal_core::error::AppError;
use docportal_core::result::AppResult;
use docportal_core::traits::clock::Clock;
use docportal_core::traits::storage::StorageProvider;

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};
use crate::signing::LinkSigner;

/// Holds one provider per container.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// Map of container name → provider instance.
    providers: Arc<RwLock<HashMap<String, Arc<dyn StorageProvider>>>>,
    document_container: String,
    short_url_container: String,
}

impl StorageManager {
    /// Create an empty manager for the given container names.
    pub fn new(document_container: &str, short_url_container: &str) -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            document_container: document_container.to_string(),
            short_url_container: short_url_container.to_string(),
        }
    }

    /// Build the document and short-URL containers from configuration.
    ///
    /// `public_base_url` roots the links issued by providers without native
    /// presigning, and `clock` times those links.
    pub async fn from_config(
        config: &StorageConfig,
        public_base_url: &str,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let manager = Self::new(&config.document_container, &config.short_url_container);
        let signer = LinkSigner::new(&config.signing_secret, public_base_url);

        for container in [&config.document_container, &config.short_url_container] {
            let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
                "local" => Arc::new(
                    LocalStorageProvider::with_clock(
                        &config.local.root_path,
                        container,
                        signer.clone(),
                        clock.clone(),
                    )
                    .await?,
                ),
                "memory" => Arc::new(MemoryStorageProvider::with_clock(
                    container,
                    signer.clone(),
                    clock.clone(),
                )),
                #[cfg(feature = "s3")]
                "s3" => Arc::new(
                    crate::providers::S3StorageProvider::new(&config.s3, container).await?,
                ),
                other => {
                    return Err(AppError::configuration(format!(
                        "Unsupported storage provider '{other}'"
                    )));
                }
            };
            info!(
                container = %container,
                provider = provider.provider_type(),
                "Registered storage container"
            );
            manager.register(provider).await;
        }

        Ok(manager)
    }

    /// Build in-memory containers stamped by `clock`.
    pub async fn in_memory(config: &StorageConfig, base_url: &str, clock: Arc<dyn Clock>) -> Self {
        let manager = Self::new(&config.document_container, &config.short_url_container);
        let signer = LinkSigner::new(&config.signing_secret, base_url);
        for container in [&config.document_container, &config.short_url_container] {
            manager
                .register(Arc::new(MemoryStorageProvider::with_clock(
                    container,
                    signer.clone(),
                    clock.clone(),
                )))
                .await;
        }
        manager
    }

    /// Register a provider under its container name, replacing any previous one.
    pub async fn register(&self, provider: Arc<dyn StorageProvider>) {
        let mut providers = self.providers.write().await;
        providers.insert(provider.container().to_string(), provider);
    }

    /// Get the provider for a container.
    pub async fn get(&self, container: &str) -> AppResult<Arc<dyn StorageProvider>> {
        let providers = self.providers.read().await;
        providers
            .get(container)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Container '{container}' not found")))
    }

    /// Provider of the document container.
    pub async fn documents(&self) -> AppResult<Arc<dyn StorageProvider>> {
        self.get(&self.document_container).await
    }

    /// Provider of the short-URL side container.
    pub async fn short_urls(&self) -> AppResult<Arc<dyn StorageProvider>> {
        self.get(&self.short_url_container).await
    }

    /// List all registered container names.
    pub async fn containers(&self) -> Vec<String> {
        let providers = self.providers.read().await;
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check health of all registered providers.
    pub async fn health_check_all(&self) -> HashMap<String, bool> {
        let providers = self.providers.read().await;
        let mut results = HashMap::new();
        for (name, provider) in providers.iter() {
            let healthy = provider.health_check().await.unwrap_or(false);
            results.insert(name.clone(), healthy);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use docportal_core::error::ErrorKind;
    use docportal_core::traits::clock::SystemClock;

    use super::*;

    #[tokio::test]
    async fn test_from_config_registers_both_containers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().to_string();

        let manager = StorageManager::from_config(&config, "http://localhost:8080", Arc::new(SystemClock))
            .await
            .unwrap();

        assert_eq!(manager.containers().await, vec!["documents", "url-shortener"]);
        assert_eq!(manager.documents().await.unwrap().provider_type(), "local");
        assert!(manager.health_check_all().await.values().all(|ok| *ok));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_configuration_error() {
        let config = StorageConfig {
            provider: "ftp".into(),
            ..StorageConfig::default()
        };
        let err = StorageManager::from_config(&config, "", Arc::new(SystemClock))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_missing_container() {
        let manager = StorageManager::new("documents", "url-shortener");
        assert!(manager.documents().await.unwrap_err().is_not_found());
    }
}
