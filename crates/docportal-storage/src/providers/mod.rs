//! Storage provider implementations.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalStorageProvider;
pub use memory::MemoryStorageProvider;
#[cfg(feature = "s3")]
pub use s3::S3StorageProvider;

use docportal_core::error::AppError;
use docportal_core::result::AppResult;

/// Rejects keys that are empty or could escape the container.
pub(crate) fn validate_key(key: &str) -> AppResult<()> {
    if key.is_empty() {
        return Err(AppError::validation("Blob name must not be empty"));
    }
    if key.starts_with('/') || key.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(AppError::validation(format!("Invalid blob name: {key}")));
    }
    Ok(())
}
