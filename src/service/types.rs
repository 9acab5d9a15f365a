//! Request and response types for the gene-guard web service

use serde::{Deserialize, Serialize};

use crate::narrative::RiskReport;
use crate::prioritize::{Extraction, ExtractionError, ProcessedVariant};

/// Query parameters accompanying an uploaded file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    /// Original file name
    pub filename: Option<String>,
    /// Subject age (default from config)
    pub age: Option<u32>,
    /// Subject gender (default from config)
    pub gender: Option<String>,
}

/// A reported variant as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantInput {
    pub variant: String,
    pub gene: String,
    pub consequence: String,
    pub impact: String,
    pub quality: f64,
}

impl From<&ProcessedVariant> for VariantInput {
    fn from(v: &ProcessedVariant) -> Self {
        Self {
            variant: v.representation.clone(),
            gene: v.gene.clone(),
            consequence: v.consequence.to_string(),
            impact: v.impact.clone(),
            quality: v.quality,
        }
    }
}

/// Response of the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Parsed narrative report
    pub ai_analysis: RiskReport,
    /// Variants the report was based on
    pub processed_variants_input: Vec<VariantInput>,
    /// Genes named in the prompt
    pub identified_genes_for_prompt: Vec<String>,
}

/// Response of the extract endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub variants: Vec<ProcessedVariant>,
    pub genes: Vec<String>,
    pub variant_summary: String,
}

impl From<Extraction> for ExtractResponse {
    fn from(extraction: Extraction) -> Self {
        Self {
            variants: extraction.variants,
            genes: extraction.genes,
            variant_summary: extraction.summary,
        }
    }
}

/// Service health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub narrative_generator: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// Error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidUpload(String),

    #[error("Could not process file: {0}")]
    Extraction(ExtractionError),

    #[error("Failed to parse AI response. The AI returned non-JSON or malformed JSON.")]
    ReportParse(String),

    #[error("Prediction process failed: {0}")]
    Narrative(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ServiceError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidUpload(_) => 400,
            ServiceError::Extraction(_) => 400,
            ServiceError::BadRequest(_) => 400,
            ServiceError::Timeout => 504,
            ServiceError::Narrative(_) => 502,
            ServiceError::ReportParse(_) => 500,
            ServiceError::ConfigError(_) => 500,
        }
    }

    /// Convert to error response
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            ServiceError::Extraction(e) => Some(serde_json::json!({ "code": e.code().as_str() })),
            ServiceError::ReportParse(msg) => Some(serde_json::json!({ "cause": msg })),
            _ => None,
        };
        ErrorResponse {
            error: match self {
                ServiceError::InvalidUpload(_) => "invalid_upload".to_string(),
                ServiceError::Extraction(_) => "extraction_failed".to_string(),
                ServiceError::ReportParse(_) => "report_parse_failed".to_string(),
                ServiceError::Narrative(_) => "narrative_failed".to_string(),
                ServiceError::Timeout => "timeout".to_string(),
                ServiceError::ConfigError(_) => "config_error".to_string(),
                ServiceError::BadRequest(_) => "bad_request".to_string(),
            },
            message: self.to_string(),
            details,
        }
    }
}

impl From<ExtractionError> for ServiceError {
    fn from(err: ExtractionError) -> Self {
        ServiceError::Extraction(err)
    }
}
