//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub generator: GeneratorStatus,
}

/// What the carousel generator will call.
#[derive(Debug, Serialize)]
pub struct GeneratorStatus {
    pub model: String,
    /// Whether a gateway API key is set.
    pub configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match vitrine_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    let gateway = &state.config.gateway;

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        generator: GeneratorStatus {
            model: gateway.model.clone(),
            configured: gateway.api_key.is_some(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
