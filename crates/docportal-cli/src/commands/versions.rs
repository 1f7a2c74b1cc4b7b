//! Print the version chain of a document.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docportal_core::error::AppError;
use docportal_core::traits::clock::{Clock, SystemClock};
use docportal_service::DocumentService;
use docportal_service::document::DocumentVersion;

use super::{Cli, open_storage};
use crate::output;

/// Arguments for the versions command
#[derive(Debug, Args)]
pub struct VersionsArgs {
    /// Logical document name (file name without extension and version tag)
    pub base_name: String,
}

#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct VersionRow {
    #[tabled(rename = "#")]
    version_number: u32,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Uploaded")]
    uploaded_at: String,
    #[tabled(rename = "Size")]
    size: String,
}

impl From<DocumentVersion> for VersionRow {
    fn from(v: DocumentVersion) -> Self {
        Self {
            version_number: v.version_number,
            file_name: v.file_name,
            uploaded_at: v.uploaded_at.to_rfc3339(),
            size: v.size,
        }
    }
}

/// Execute the versions command
pub async fn execute(args: &VersionsArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let storage = open_storage(&config).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = DocumentService::new(storage.documents().await?, clock);
    let rows: Vec<VersionRow> = service
        .versions(&args.base_name)
        .await?
        .into_iter()
        .map(VersionRow::from)
        .collect();

    output::print_list(&rows, cli.format);
    Ok(())
}
