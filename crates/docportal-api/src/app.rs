//! Application builder: wires storage, services, and the router into a
//! running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use docportal_core::config::AppConfig;
use docportal_core::error::AppError;
use docportal_core::traits::clock::{Clock, SystemClock};
use docportal_service::ShortUrlSweeper;
use docportal_storage::StorageManager;

use crate::router::build_router;
use crate::state::{AppState, link_base_url};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the DocPortal server until SIGINT/SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocPortal server...");

    // ── Step 1: Validate configuration ───────────────────────────
    config.validate()?;

    // ── Step 2: Initialize storage containers ────────────────────
    tracing::info!(
        provider = %config.storage.provider,
        documents = %config.storage.document_container,
        short_urls = %config.storage.short_url_container,
        "Initializing storage"
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage_manager = Arc::new(
        StorageManager::from_config(&config.storage, &link_base_url(&config), clock.clone())
            .await?,
    );

    for (container, healthy) in storage_manager.health_check_all().await {
        if healthy {
            tracing::info!(container = %container, "Storage container reachable");
        } else {
            tracing::warn!(container = %container, "Storage container did not answer health check");
        }
    }

    // ── Step 3: Build application state ──────────────────────────
    let state = AppState::build(config.clone(), storage_manager, clock).await?;

    // ── Step 4: Start short URL sweeper ──────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_handle = if config.short_url.sweep_interval_seconds > 0 {
        tracing::info!(
            interval_seconds = config.short_url.sweep_interval_seconds,
            "Starting short URL sweeper"
        );
        let sweeper = ShortUrlSweeper::new(
            state.short_url_service.clone(),
            Duration::from_secs(config.short_url.sweep_interval_seconds),
        );
        Some(sweeper.spawn(shutdown_rx))
    } else {
        None
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DocPortal server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain background tasks ───────────────────────────
    if let Some(handle) = sweeper_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Short URL sweeper did not stop within the grace period");
        }
    }

    tracing::info!("DocPortal server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
