//! Delete expired short URL records.

use std::sync::Arc;

use docportal_core::error::AppError;
use docportal_core::traits::clock::{Clock, SystemClock};
use docportal_service::ShortUrlService;

use super::{Cli, open_storage};
use crate::output::{self, OutputFormat};

/// Execute the sweep command
pub async fn execute(cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let storage = open_storage(&config).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = ShortUrlService::new(storage.short_urls().await?, clock, config.short_url.clone());
    let removed = service.sweep_expired().await?;

    match cli.format {
        OutputFormat::Json => {
            output::print_item(&serde_json::json!({ "removed": removed }), OutputFormat::Json)
        }
        OutputFormat::Table => {
            output::print_success(&format!("Removed {removed} expired short URL(s)"))
        }
    }

    Ok(())
}
