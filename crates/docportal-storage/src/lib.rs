//! # docportal-storage
//!
//! Blob storage providers for DocPortal. Every provider is bound to exactly
//! one container; the [`StorageManager`] maps container names to providers.

pub mod manager;
pub mod mime;
pub mod providers;
pub mod signing;

pub use manager::StorageManager;
pub use signing::{LinkClaims, LinkSigner};
