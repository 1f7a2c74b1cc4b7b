//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage: std::collections::BTreeMap<String, bool> =
        state.storage_manager.health_check_all().await.into_iter().collect();
    let status = if storage.values().all(|ok| *ok) { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    })
}
