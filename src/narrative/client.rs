//! Narrative generator clients
//!
//! The narrative generator is an external generative-language endpoint that
//! turns a filled prompt into free text. Only the transport lives here; the
//! reply is interpreted by [`super::parse_risk_report`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, GeneGuardError};

/// Narrative generator configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Base URL of the generative-language API
    pub api_url: String,
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.5,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 3000,
            timeout_seconds: 60,
        }
    }
}

/// Something that turns a prompt into narrative text
#[async_trait::async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate text for a filled prompt
    async fn generate(&self, prompt: &str) -> Result<String, GeneGuardError>;

    /// Name used in logs and service info
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Client for the Gemini `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: NarrativeConfig,
    api_key: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key
    pub fn new(config: NarrativeConfig, api_key: impl Into<String>) -> Result<Self, GeneGuardError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .build()
            .map_err(|e| GeneGuardError::Config {
                msg: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Create a client reading the API key from `config.api_key_env`
    pub fn from_env(config: NarrativeConfig) -> Result<Self, GeneGuardError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GeneGuardError::Config {
                msg: format!("{} is not set in the environment", config.api_key_env),
            })?;
        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait::async_trait]
impl NarrativeGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeneGuardError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        tracing::debug!("Sending prompt of {} bytes to {}", prompt.len(), self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GeneGuardError::narrative(ErrorCode::NarrativeFailed, format!("HTTP request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GeneGuardError::narrative(
                ErrorCode::NarrativeFailed,
                format!("{} returned HTTP {}: {}", self.config.model, status, detail),
            ));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            GeneGuardError::narrative(
                ErrorCode::NarrativeFailed,
                format!("Unexpected response body: {}", e),
            )
        })?;

        parsed.first_text().ok_or_else(|| {
            tracing::error!("Narrative text not found in expected location of response");
            GeneGuardError::narrative(
                ErrorCode::NarrativeEmpty,
                "AI returned an empty text response or text could not be extracted.",
            )
        })
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Generator returning a fixed reply, for tests and offline runs
#[derive(Debug, Clone)]
pub struct StaticNarrative {
    reply: String,
}

impl StaticNarrative {
    /// Create a generator that always returns `reply`
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait::async_trait]
impl NarrativeGenerator for StaticNarrative {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneGuardError> {
        if self.reply.trim().is_empty() {
            return Err(GeneGuardError::narrative(
                ErrorCode::NarrativeEmpty,
                "AI returned an empty text response or text could not be extracted.",
            ));
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
