//! Liveness and connectivity probes.

use axum::{extract::State, http::StatusCode, Json};

use memlink_core::HealthStatus;

use crate::state::AppState;

/// Liveness probe. Always succeeds if the process can answer.
pub async fn ping() -> &'static str {
    "pong"
}

/// Connectivity probe against the backing store.
///
/// A failed probe is reported in the body with a 503, never as an error.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.memory.health().await;
    let code = match status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Error { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(status))
}
