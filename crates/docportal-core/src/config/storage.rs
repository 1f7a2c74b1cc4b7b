//! Storage provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider backing every container: `"local"`, `"memory"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Container holding the documents.
    #[serde(default = "default_document_container")]
    pub document_container: String,
    /// Side container holding short-URL records.
    #[serde(default = "default_short_url_container")]
    pub short_url_container: String,
    /// Secret used to sign local download links.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Lifetime of download links in minutes.
    #[serde(default = "default_download_ttl")]
    pub download_link_ttl_minutes: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            document_container: default_document_container(),
            short_url_container: default_short_url_container(),
            signing_secret: default_signing_secret(),
            download_link_ttl_minutes: default_download_ttl(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path; each container is a directory beneath it.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
///
/// Each container maps to a bucket named `{bucket_prefix}{container}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Prefix prepended to container names to form bucket names.
    #[serde(default)]
    pub bucket_prefix: String,
    /// Access key ID (empty uses the default credential chain).
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by most MinIO setups).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket_prefix: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_document_container() -> String {
    "documents".to_string()
}

fn default_short_url_container() -> String {
    "url-shortener".to_string()
}

fn default_signing_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_download_ttl() -> u64 {
    15
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
