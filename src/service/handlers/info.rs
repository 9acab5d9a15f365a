//! Service information endpoints

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use super::UPLOAD_FIELD;
use crate::service::server::AppState;

/// Provide basic service information
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    let prioritize = &state.config.prioritize;

    Json(json!({
        "service": "gene-guard-web",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Annotated VCF prioritization and narrative risk reports",
        "narrative_generator": state.narrative.name(),
        "thresholds": {
            "min_quality": prioritize.min_quality,
            "max_allele_frequency": prioritize.max_allele_frequency,
            "max_variants": prioritize.max_variants,
        },
        "limits": {
            "max_upload_size": state.config.server.max_upload_size,
            "request_timeout_seconds": state.config.server.request_timeout_seconds,
        },
        "upload": {
            "multipart_field": UPLOAD_FIELD,
            "raw_body_query": ["filename", "age", "gender"],
        },
        "endpoints": {
            "predict": ["POST /api/predict", "POST /api/v1/predict"],
            "extract": "POST /api/v1/extract",
            "health": ["GET /health", "GET /api/v1/health"],
            "info": "GET /api/v1/info"
        }
    }))
}
