//! Health check endpoints.

use std::time::Duration;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::error;

use crate::AppState;

/// Upper bound on each readiness probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Readiness response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: &'static str,
    /// Account store reachable.
    pub account_store: bool,
    /// ERP reachable.
    pub erp: bool,
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness handler: pings the account store and the ERP.
async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let account_store = match tokio::time::timeout(PROBE_TIMEOUT, state.db.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(error = %e, "Readiness: account store ping failed");
            false
        }
        Err(_) => {
            error!("Readiness: account store ping timed out (3s)");
            false
        }
    };

    let erp = match tokio::time::timeout(PROBE_TIMEOUT, state.erp.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(error = %e, "Readiness: ERP ping failed");
            false
        }
        Err(_) => {
            error!("Readiness: ERP ping timed out (3s)");
            false
        }
    };

    Json(ReadinessResponse {
        status: if account_store && erp { "ok" } else { "degraded" },
        account_store,
        erp,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness))
}
