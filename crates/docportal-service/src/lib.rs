//! # docportal-service
//!
//! Business logic for DocPortal. Documents are derived views over a flat blob
//! container: versions are encoded in blob names, grouped on every read, and
//! never cached. Short URLs are JSON records kept in a side container.
//!
//! Services follow constructor injection: every dependency is provided at
//! construction time via `Arc` references.

pub mod context;
pub mod document;
pub mod shortlink;

pub use context::RequestContext;
pub use document::{DocumentService, ShareService, UploadService};
pub use shortlink::{ShortUrlService, ShortUrlSweeper};
