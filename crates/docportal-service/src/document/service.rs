//! Document listing, version chains, and deletion.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use docportal_core::error::AppError;
use docportal_core::traits::clock::Clock;
use docportal_core::traits::storage::{StorageObjectMeta, StorageProvider};

use super::grouping::{group, versions_of};
use super::model::{DeleteOutcome, DocumentGroup, DocumentListItem, DocumentVersion};
use crate::context::RequestContext;

/// Read and delete operations over the document container.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Document container.
    storage: Arc<dyn StorageProvider>,
    /// Time source for blobs lacking a timestamp.
    clock: Arc<dyn Clock>,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(storage: Arc<dyn StorageProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Groups the whole container into documents.
    pub async fn groups(&self) -> Result<Vec<DocumentGroup>, AppError> {
        let entries = self.storage.list().await?;
        Ok(group(&entries, self.clock.now()))
    }

    /// Lists documents: the latest version of each, or every version.
    pub async fn list(&self, include_versions: bool) -> Result<Vec<DocumentListItem>, AppError> {
        let groups = self.groups().await?;

        let items = if include_versions {
            groups
                .iter()
                .flat_map(|doc| {
                    doc.versions.iter().map(move |version| {
                        DocumentListItem::from_version(
                            version,
                            doc.versions.len(),
                            &version.original_name,
                        )
                    })
                })
                .collect()
        } else {
            groups
                .iter()
                .filter_map(|doc| {
                    doc.latest_version().map(|latest| {
                        DocumentListItem::from_version(
                            latest,
                            doc.versions.len(),
                            &doc.original_name,
                        )
                    })
                })
                .collect()
        };

        Ok(items)
    }

    /// Version chain of the document with `base_name`, newest first.
    pub async fn versions(&self, base_name: &str) -> Result<Vec<DocumentVersion>, AppError> {
        if base_name.is_empty() {
            return Err(AppError::validation("Base name is required"));
        }
        let entries = self.storage.list().await?;
        Ok(versions_of(&entries, base_name, self.clock.now()))
    }

    /// Deletes one blob. Fails with `NotFound` when it does not exist.
    pub async fn delete(&self, ctx: &RequestContext, name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::validation("Document name is required"));
        }
        self.storage.delete(name).await?;
        info!(
            user = %ctx.display_name,
            name,
            "Document deleted"
        );
        Ok(())
    }

    /// Deletes several blobs concurrently, reporting each outcome.
    ///
    /// Outcomes are returned in input order; failures do not abort the batch.
    pub async fn delete_many(&self, ctx: &RequestContext, names: &[String]) -> Vec<DeleteOutcome> {
        let outcomes = join_all(names.iter().map(|name| async move {
            match self.delete(ctx, name).await {
                Ok(()) => DeleteOutcome {
                    name: name.clone(),
                    deleted: true,
                    error: None,
                },
                Err(e) => {
                    warn!(name = %name, error = %e, "Failed to delete document");
                    DeleteOutcome {
                        name: name.clone(),
                        deleted: false,
                        error: Some(e.message),
                    }
                }
            }
        }))
        .await;

        let failed = outcomes.iter().filter(|o| !o.deleted).count();
        info!(
            user = %ctx.display_name,
            requested = names.len(),
            failed,
            "Bulk delete finished"
        );
        outcomes
    }

    /// First `limit` blobs of the container and the total count.
    pub async fn sample(&self, limit: usize) -> Result<(Vec<StorageObjectMeta>, usize), AppError> {
        let mut entries = self.storage.list().await?;
        let total = entries.len();
        entries.truncate(limit);
        Ok((entries, total))
    }
}
