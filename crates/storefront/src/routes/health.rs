//! Liveness and readiness probes.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// How long the readiness probe waits for a connection.
const READY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Liveness health check.
///
/// GET /api/health
///
/// Does not check dependencies.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Readiness health check.
///
/// GET /health/ready
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let ping = sqlx::query("SELECT 1").fetch_one(state.pool());
    match tokio::time::timeout(READY_TIMEOUT, ping).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            tracing::warn!("Readiness check timed out");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
