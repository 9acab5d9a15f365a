//! Configuration for the gene-guard web service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::narrative::NarrativeConfig;
use crate::prioritize::PrioritizeConfig;

/// Main service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Variant prioritization thresholds
    #[serde(default)]
    pub prioritize: PrioritizeConfig,
    /// Narrative generator configuration
    #[serde(default)]
    pub narrative: NarrativeConfig,
    /// Prompt template configuration
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,
    /// Port to listen on (default: 5174)
    pub port: u16,
    /// Maximum upload size (default: "10MB")
    pub max_upload_size: String,
    /// Timeout for the narrative call in seconds (default: 60)
    pub request_timeout_seconds: u64,
    /// Enable permissive CORS headers (default: true)
    pub enable_cors: bool,
}

/// Prompt template configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Template file, used when the environment variable is unset
    pub template_path: PathBuf,
    /// Environment variable that may hold the whole template
    pub template_env: Option<String>,
    /// Age used when a request does not give one
    pub default_age: u32,
    /// Gender used when a request does not give one
    pub default_gender: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5174,
            max_upload_size: "10MB".to_string(),
            request_timeout_seconds: 60,
            enable_cors: true,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("prompt.txt"),
            template_env: Some("GENAI_PROMPT".to_string()),
            default_age: 25,
            default_gender: "female".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if super::server::parse_size(&self.server.max_upload_size).is_err() {
            return Err(format!(
                "Invalid max_upload_size: {}",
                self.server.max_upload_size
            ));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err("request_timeout_seconds must be greater than 0".to_string());
        }

        self.prioritize.validate().map_err(|e| e.to_string())?;

        if self.narrative.model.is_empty() {
            return Err("Narrative model must not be empty".to_string());
        }

        Ok(())
    }
}
