//! Documents: blob naming, version grouping, listing, upload, and sharing.

pub mod grouping;
pub mod model;
pub mod naming;
pub mod service;
pub mod share;
pub mod upload;

pub use model::{DeleteOutcome, DocumentGroup, DocumentListItem, DocumentVersion};
pub use service::DocumentService;
pub use share::ShareService;
pub use upload::{UploadOutcome, UploadRequest, UploadService};
