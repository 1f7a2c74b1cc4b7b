//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! layered TOML files and `DOCPORTAL__*` environment variables. Each
//! sub-module represents a logical configuration section, and every field
//! carries a default so an empty configuration is valid.

pub mod app;
pub mod auth;
pub mod logging;
pub mod short_url;
pub mod storage;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::short_url::ShortUrlConfig;
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use self::upload::{CollisionMode, UploadConfig};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DOCPORTAL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload limits and collision policy.
    #[serde(default)]
    pub upload: UploadConfig,
    /// URL shortener settings.
    #[serde(default)]
    pub short_url: ShortUrlConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables prefixed with `DOCPORTAL__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_layers(&["config/default".to_string(), format!("config/{env}")])
    }

    /// Load configuration from an explicit file plus its environment overlay
    /// (a sibling file named after `env`) and environment variables.
    pub fn load_file(path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = std::path::Path::new(path)
            .with_file_name(env)
            .to_string_lossy()
            .to_string();
        Self::load_layers(&[path.to_string(), overlay])
    }

    fn load_layers(files: &[String]) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        for file in files {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage.document_container.trim().is_empty() {
            return Err(AppError::configuration(
                "storage.document_container must not be empty",
            ));
        }
        if self.storage.document_container == self.storage.short_url_container {
            return Err(AppError::configuration(
                "storage.short_url_container must differ from storage.document_container",
            ));
        }
        if self.short_url.code_length == 0 {
            return Err(AppError::configuration("short_url.code_length must be > 0"));
        }
        if self.short_url.max_generation_attempts == 0 {
            return Err(AppError::configuration(
                "short_url.max_generation_attempts must be > 0",
            ));
        }
        if self.upload.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "upload.max_upload_size_bytes must be > 0",
            ));
        }
        Ok(())
    }
}
