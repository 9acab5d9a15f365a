//! Health check endpoint

use axum::{extract::State, response::Json};

use crate::service::{server::AppState, types::HealthResponse};

/// Report liveness and the configured narrative generator
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        narrative_generator: state.narrative.name().to_string(),
        started_at: state.started_at,
    })
}
