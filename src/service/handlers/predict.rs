//! Prediction endpoint
//!
//! Upload → extraction → prompt → narrative → parsed report.

use std::time::Duration;

use axum::{extract::State, response::Json};

use super::{error_response, receive_and_extract, HandlerError, Upload};
use crate::error::GeneGuardError;
use crate::narrative::parse_risk_report;
use crate::prompt::Subject;
use crate::service::{
    server::AppState,
    types::{PredictResponse, ServiceError, VariantInput},
    validation::validate_gender,
};

/// Produce a narrative risk report for an uploaded VCF
pub async fn predict(
    State(state): State<AppState>,
    upload: Upload,
) -> Result<Json<PredictResponse>, HandlerError> {
    let subject = subject_from_upload(&state, &upload)?;
    let extraction = receive_and_extract(&state, &upload)?;

    let prompt = state.template.fill(&subject, &extraction);
    tracing::debug!(
        "Prompt filled for {} variant(s), {} gene(s)",
        extraction.variants.len(),
        extraction.genes.len()
    );

    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let raw = match tokio::time::timeout(timeout, state.narrative.generate(&prompt)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::error!("Narrative generation failed: {}", e.detailed_message());
            return Err(error_response(ServiceError::Narrative(e.to_string())));
        }
        Err(_) => {
            tracing::error!("Narrative generation timed out after {:?}", timeout);
            return Err(error_response(ServiceError::Timeout));
        }
    };

    let report = parse_risk_report(&raw).map_err(|e| {
        tracing::error!("Could not parse narrative reply: {}", e);
        let cause = match e {
            GeneGuardError::ReportParse { msg } => msg,
            other => other.to_string(),
        };
        error_response(ServiceError::ReportParse(cause))
    })?;

    Ok(Json(PredictResponse {
        ai_analysis: report,
        processed_variants_input: extraction.variants.iter().map(VariantInput::from).collect(),
        identified_genes_for_prompt: extraction.genes,
    }))
}

fn subject_from_upload(state: &AppState, upload: &Upload) -> Result<Subject, HandlerError> {
    let gender = upload
        .gender
        .clone()
        .unwrap_or_else(|| state.config.prompt.default_gender.clone());
    validate_gender(&gender)
        .map_err(|e| error_response(ServiceError::BadRequest(e.to_string())))?;

    Ok(Subject {
        age: upload.age.unwrap_or(state.config.prompt.default_age),
        gender,
    })
}
