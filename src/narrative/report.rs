//! Parsing the narrative reply into a structured report
//!
//! Generative models rarely return bare JSON. The reply is searched for, in
//! order of appearance, either a fenced ```` ```json ```` block or the span
//! from the first `{` to the last `}`; if neither is found the whole reply is
//! parsed as JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GeneGuardError;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```|(\{.*\})").expect("valid regex"));

/// A disease association in the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiseaseAssociation {
    pub disease: String,
    pub description: String,
    pub inheritance: Option<String>,
    pub confidence: Option<String>,
}

/// A gene interpretation in the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneInterpretation {
    pub gene_name: String,
    pub function: Option<String>,
    pub implication_of_variant: Option<String>,
}

/// Disease-risk report returned by the narrative generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    /// Overall risk level, e.g. "Low", "Moderate", "High"
    pub risk_level: String,
    pub summary: String,
    #[serde(default)]
    pub diseases: Vec<DiseaseAssociation>,
    #[serde(default)]
    pub genes: Vec<GeneInterpretation>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub limitations: String,
    /// Any additional fields the model returned
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Locate the JSON payload within a reply
pub fn extract_json_payload(raw: &str) -> &str {
    match JSON_BLOCK.captures(raw) {
        Some(caps) => caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or(raw, |m| m.as_str()),
        None => {
            tracing::warn!("No JSON block found in narrative reply; parsing raw text");
            raw
        }
    }
}

/// Parse a narrative reply into a [`RiskReport`]
pub fn parse_risk_report(raw: &str) -> Result<RiskReport, GeneGuardError> {
    let payload = extract_json_payload(raw);
    serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Narrative reply JSON parsing failed: {}", e);
        GeneGuardError::ReportParse { msg: e.to_string() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
  "riskLevel": "Moderate",
  "summary": "One loss-of-function variant.",
  "diseases": [
    {"disease": "Hereditary breast cancer", "description": "Elevated risk", "inheritance": "AD", "confidence": "High"}
  ],
  "genes": [
    {"geneName": "BRCA1", "function": "DNA repair", "implicationOfVariant": "Truncated protein"}
  ],
  "recommendation": "Consult a genetic counselor.",
  "limitations": "Annotation-based only."
}"#;

    #[test]
    fn test_parse_bare_json() {
        let report = parse_risk_report(REPORT).unwrap();
        assert_eq!(report.risk_level, "Moderate");
        assert_eq!(report.diseases.len(), 1);
        assert_eq!(report.diseases[0].inheritance.as_deref(), Some("AD"));
        assert_eq!(report.genes[0].gene_name, "BRCA1");
        assert_eq!(
            report.genes[0].implication_of_variant.as_deref(),
            Some("Truncated protein")
        );
        assert!(report.extra.is_empty());
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = format!("Here is the analysis:\n```json\n{}\n```\nThanks.", REPORT);
        let report = parse_risk_report(&raw).unwrap();
        assert_eq!(report.recommendation, "Consult a genetic counselor.");
    }

    #[test]
    fn test_parse_embedded_object() {
        let raw = format!("Sure! {} Let me know if you need more.", REPORT);
        let report = parse_risk_report(&raw).unwrap();
        assert_eq!(report.summary, "One loss-of-function variant.");
    }

    #[test]
    fn test_optional_sections_default() {
        let report = parse_risk_report(r#"{"riskLevel": "Low", "summary": "Nothing notable."}"#).unwrap();
        assert!(report.diseases.is_empty());
        assert!(report.genes.is_empty());
        assert_eq!(report.limitations, "");
    }

    #[test]
    fn test_extra_fields_preserved() {
        let report =
            parse_risk_report(r#"{"riskLevel": "Low", "summary": "s", "disclaimer": "x"}"#).unwrap();
        assert_eq!(report.extra.get("disclaimer"), Some(&serde_json::json!("x")));
        let round = serde_json::to_value(&report).unwrap();
        assert_eq!(round["disclaimer"], "x");
        assert_eq!(round["riskLevel"], "Low");
    }

    #[test]
    fn test_unparseable_reply() {
        let err = parse_risk_report("I cannot help with that.").unwrap_err();
        assert!(matches!(err, GeneGuardError::ReportParse { .. }));

        let err = parse_risk_report("```json\n{not json}\n```").unwrap_err();
        assert!(matches!(err, GeneGuardError::ReportParse { .. }));
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(parse_risk_report(r#"{"summary": "no risk level"}"#).is_err());
    }

    #[test]
    fn test_extract_json_payload() {
        assert_eq!(extract_json_payload("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json_payload("x {\"a\":{\"b\":2}} y"), "{\"a\":{\"b\":2}}");
        assert_eq!(extract_json_payload("plain"), "plain");
    }
}
