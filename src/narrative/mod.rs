//! Narrative generation
//!
//! Sends the filled prompt to a generative-language endpoint and parses the
//! reply into a [`RiskReport`]. How the model produces its text is opaque to
//! this crate.

#[cfg(feature = "web-service")]
mod client;
mod report;

#[cfg(feature = "web-service")]
pub use client::{GeminiClient, NarrativeConfig, NarrativeGenerator, StaticNarrative};
pub use report::{
    extract_json_payload, parse_risk_report, DiseaseAssociation, GeneInterpretation, RiskReport,
};
