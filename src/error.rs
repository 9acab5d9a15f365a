//! Error types for gene-guard
//!
//! This module provides:
//! - Error codes for categorization
//! - The crate-wide error type used outside of variant extraction
//!
//! Extraction failures are not errors in this sense: they are reported as
//! data through [`crate::prioritize::ExtractionError`] so callers can decide
//! how to present them.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Extraction errors (E1xxx)
    /// Input was empty or whitespace only
    EmptyInput = 1001,
    /// Input contained only header/comment lines
    NoDataLines = 1002,
    /// Every record was rejected by a filter stage
    NoQualifyingVariants = 1003,

    // Template errors (E2xxx)
    /// Prompt template could not be loaded
    TemplateUnavailable = 2001,
    /// Prompt template was empty
    TemplateEmpty = 2002,

    // Narrative errors (E3xxx)
    /// Narrative generator request failed
    NarrativeFailed = 3001,
    /// Narrative generator returned no text
    NarrativeEmpty = 3002,
    /// Narrative reply did not contain a parseable report
    ReportUnparseable = 3003,

    // Configuration errors (E4xxx)
    /// Invalid configuration value
    InvalidConfig = 4001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::EmptyInput => "input is empty",
            ErrorCode::NoDataLines => "no data lines after filtering headers",
            ErrorCode::NoQualifyingVariants => "no variants passed filtering",
            ErrorCode::TemplateUnavailable => "prompt template unavailable",
            ErrorCode::TemplateEmpty => "prompt template is empty",
            ErrorCode::NarrativeFailed => "narrative generation failed",
            ErrorCode::NarrativeEmpty => "narrative generator returned no text",
            ErrorCode::ReportUnparseable => "narrative reply is not a valid report",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for gene-guard operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneGuardError {
    /// Prompt template could not be loaded or is empty
    #[error("Template error: {msg}")]
    Template { msg: String, code: ErrorCode },

    /// Narrative generator call failed or returned nothing usable
    #[error("Narrative generation failed: {msg}")]
    Narrative { msg: String, code: ErrorCode },

    /// Narrative reply could not be parsed into a report
    #[error("Failed to parse AI response: {msg}")]
    ReportParse { msg: String },

    /// Invalid configuration
    #[error("Configuration error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl GeneGuardError {
    /// Create a template error with the given code
    pub fn template(code: ErrorCode, msg: impl Into<String>) -> Self {
        GeneGuardError::Template {
            msg: msg.into(),
            code,
        }
    }

    /// Create a narrative error with the given code
    pub fn narrative(code: ErrorCode, msg: impl Into<String>) -> Self {
        GeneGuardError::Narrative {
            msg: msg.into(),
            code,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            GeneGuardError::Template { code, .. } => *code,
            GeneGuardError::Narrative { code, .. } => *code,
            GeneGuardError::ReportParse { .. } => ErrorCode::ReportUnparseable,
            GeneGuardError::Config { .. } => ErrorCode::InvalidConfig,
            GeneGuardError::Io { .. } => ErrorCode::IoError,
            GeneGuardError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Get the message prefixed with its error code, e.g. "[E3001] ..."
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for GeneGuardError {
    fn from(err: std::io::Error) -> Self {
        GeneGuardError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GeneGuardError {
    fn from(err: serde_json::Error) -> Self {
        GeneGuardError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GeneGuardError {
    fn from(err: toml::de::Error) -> Self {
        GeneGuardError::Config {
            msg: err.to_string(),
        }
    }
}
