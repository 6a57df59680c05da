//! Health check endpoint
//!
//! Runs the liveness check; 503 with the failure reason when the database
//! cannot be reached.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::db::{PoolStatus, TransactionRepo};
use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub hostname: String,
    pub pool: PoolStatus,
    /// Why the database check failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = TransactionRepo::new(&state.pool).ping().await;

    let (status, body_status, message) = if reachable.is_ok() {
        (
            StatusCode::OK,
            "healthy",
            "Service is running and database connection is established",
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            "Database connection failed",
        )
    };

    let body = HealthResponse {
        status: body_status,
        message,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        hostname: current_hostname(),
        pool: state.pool.status(),
        error: reachable.err().map(|e| e.to_string()),
    };

    (status, Json(body))
}

fn current_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
