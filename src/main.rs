//! DocPortal Server: document storage, versioning, sharing, and short links.
//!
//! Main entry point that loads configuration, initializes logging, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use docportal_core::config::AppConfig;
use docportal_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!("Starting DocPortal v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = docportal_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DOCPORTAL_ENV").unwrap_or_else(|_| "development".to_string());

    match std::env::var("DOCPORTAL_CONFIG") {
        Ok(path) => AppConfig::load_file(&path, &env),
        Err(_) => AppConfig::load(&env),
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
