use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of the health probe response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database round trip succeeded.
    pub db_healthy: bool,
}

/// GET /health
///
/// Liveness plus a database connectivity probe. Always 200; a broken
/// database shows up as `status: "degraded"` rather than an error, so
/// orchestration can distinguish "process up, store down" from "down".
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = skillhub_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Health routes, mounted at the root (deliberately outside `/auth` and
/// its rate limiter).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
