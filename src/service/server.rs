//! Web server setup using Axum framework

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::narrative::{GeminiClient, NarrativeGenerator};
use crate::prompt::PromptTemplate;
use crate::service::{
    config::ServiceConfig,
    handlers,
    types::{ErrorResponse, ServiceError},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<ServiceConfig>,
    /// Prompt template, loaded once at startup
    pub template: Arc<PromptTemplate>,
    /// Narrative generator
    pub narrative: Arc<dyn NarrativeGenerator>,
    /// Upload size limit in bytes
    pub max_upload_bytes: usize,
    /// Service start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Assemble state from already-built collaborators
    pub fn new(
        config: ServiceConfig,
        template: PromptTemplate,
        narrative: Arc<dyn NarrativeGenerator>,
    ) -> Result<Self, ServiceError> {
        let max_upload_bytes = parse_size(&config.server.max_upload_size)
            .map_err(|e| ServiceError::ConfigError(format!("Invalid max_upload_size: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            template: Arc::new(template),
            narrative,
            max_upload_bytes,
            started_at: chrono::Utc::now(),
        })
    }

    /// Build state from configuration: load the prompt template and create
    /// the Gemini client from the configured API key variable
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        let template = PromptTemplate::load(
            config.prompt.template_env.as_deref(),
            &config.prompt.template_path,
        )
        .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        let client = GeminiClient::from_env(config.narrative.clone())
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;
        tracing::info!("Narrative generator: {}", client.name());

        Self::new(config, template, Arc::new(client))
    }
}

/// Create the Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let enable_cors = state.config.server.enable_cors;
    let max_size = state.max_upload_bytes;

    let mut app = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/health", get(handlers::health::health_check))
        // Prediction
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/v1/predict", post(handlers::predict::predict))
        // Extraction only
        .route("/api/v1/extract", post(handlers::extract::extract_variants))
        // API info endpoint
        .route("/api/v1/info", get(handlers::info::service_info))
        // Handle 404s
        .fallback(handle_404)
        .with_state(state);

    app = app.layer(DefaultBodyLimit::max(max_size));
    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

/// Handle 404 errors
async fn handle_404() -> (StatusCode, Json<ErrorResponse>) {
    let error = ServiceError::BadRequest("Endpoint not found".to_string());
    (StatusCode::NOT_FOUND, Json(error.to_response()))
}

/// Parse size strings like "10MB", "1GB", etc.
pub fn parse_size(size_str: &str) -> Result<usize, String> {
    let size_str = size_str.trim().to_uppercase();

    // Check longer suffixes first to avoid partial matches
    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    num_str
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| format!("Invalid size format: {}", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("100B").unwrap(), 100);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("10MB").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);

        // Case insensitive
        assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);

        // Invalid formats
        assert!(parse_size("invalid").is_err());
        assert!(parse_size("10XB").is_err());
    }

    #[test]
    fn test_parse_size_overflow() {
        let huge = format!("{}GB", usize::MAX / 2);
        assert!(parse_size(&huge).is_err());
    }
}
