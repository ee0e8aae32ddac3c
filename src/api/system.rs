//! Health endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, HealthResponse, ReadinessChecks, ReadinessResponse};

/// `GET /api/v1/health`
///
/// Liveness only; never touches the database.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Employee API is running".to_string(),
    })
}

/// `GET /api/v1/health/ready`
///
/// Readiness probe that checks database connectivity.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let db_ready = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e:#}");
            false
        }
    };

    let status = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: db_ready,
            checks: ReadinessChecks { database: db_ready },
        }),
    )
        .into_response()
}
