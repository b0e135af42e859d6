//! Liveness of the properties service and its database connection.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the connection cannot run a query.
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the service's single connection answered `SELECT 1`.
    pub db_healthy: bool,
}

/// GET /health
///
/// Always 200; a broken connection shows up as `db_healthy: false`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match prism_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
