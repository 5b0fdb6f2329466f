//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness; never touches storage
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness, backed by the storage port's health check
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let result = state.port.health_check().await;

    if result.is_healthy() {
        (StatusCode::OK, Json(HealthResponse { status: "ready" }))
    } else {
        warn!(
            adapter = %result.adapter_id,
            latency_ms = result.latency_ms,
            message = result.message.as_deref().unwrap_or(""),
            "Readiness check failed"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse { status: "unavailable" }),
        )
    }
}
