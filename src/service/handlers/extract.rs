//! Extraction-only endpoint

use axum::{extract::State, response::Json};

use super::{receive_and_extract, HandlerError, Upload};
use crate::service::{server::AppState, types::ExtractResponse};

/// Extract and rank notable variants without calling the narrative generator
pub async fn extract_variants(
    State(state): State<AppState>,
    upload: Upload,
) -> Result<Json<ExtractResponse>, HandlerError> {
    let extraction = receive_and_extract(&state, &upload)?;
    Ok(Json(ExtractResponse::from(extraction)))
}
