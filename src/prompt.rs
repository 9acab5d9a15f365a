//! Prompt template loading and filling
//!
//! The template is plain text with `${name}` placeholders:
//!
//! | placeholder | value |
//! |---|---|
//! | `${age}` | patient age |
//! | `${gender}` | patient gender |
//! | `${variantSummary}` | extraction summary |
//! | `${geneList}` | comma-separated genes |
//! | `${detailedVariantInfo}` | one line per variant |
//!
//! Unknown placeholders are left untouched. Substitution is a single pass
//! over the template, so placeholder-like text inside substituted values
//! (a variant ID such as `${geneList}`) is never expanded.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{ErrorCode, GeneGuardError};
use crate::prioritize::{Extraction, ProcessedVariant, GENE_NOT_AVAILABLE};

/// Gene list text used when no gene could be named
pub const NO_GENES_TEXT: &str = "not specifically identified from these filtered variants";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("valid regex"));

const DETAILED_INFO_HEADER: &str =
    "\nKey variants considered for analysis (effects are based on VCF annotations):\n";

/// Subject details substituted into the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub age: u32,
    pub gender: String,
}

impl Default for Subject {
    fn default() -> Self {
        Self {
            age: 25,
            gender: "female".to_string(),
        }
    }
}

/// A loaded prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Wrap template text; empty or whitespace-only text is rejected
    pub fn new(text: impl Into<String>) -> Result<Self, GeneGuardError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GeneGuardError::template(
                ErrorCode::TemplateEmpty,
                "prompt template is empty",
            ));
        }
        Ok(Self { text })
    }

    /// Load the template from an environment variable, falling back to a file.
    ///
    /// The variable wins when it is set and non-empty.
    pub fn load(env_var: Option<&str>, path: &Path) -> Result<Self, GeneGuardError> {
        if let Some(var) = env_var {
            if let Ok(text) = std::env::var(var) {
                if !text.trim().is_empty() {
                    tracing::info!("Loaded prompt template from ${}", var);
                    return Self::new(text);
                }
            }
        }
        Self::from_file(path)
    }

    /// Load the template from a file
    pub fn from_file(path: &Path) -> Result<Self, GeneGuardError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GeneGuardError::template(
                ErrorCode::TemplateUnavailable,
                format!("could not read {}: {}", path.display(), e),
            )
        })?;
        tracing::info!("Loaded prompt template from {}", path.display());
        Self::new(text)
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute every placeholder
    pub fn fill(&self, subject: &Subject, extraction: &Extraction) -> String {
        let age = subject.age.to_string();
        let gene_list = gene_list_text(&extraction.genes);
        let details = detailed_variant_info(&extraction.variants);

        PLACEHOLDER
            .replace_all(&self.text, |caps: &Captures| {
                let value = match &caps[1] {
                    "age" => age.as_str(),
                    "gender" => subject.gender.as_str(),
                    "variantSummary" => extraction.summary.as_str(),
                    "geneList" => gene_list.as_str(),
                    "detailedVariantInfo" => details.as_str(),
                    _ => &caps[0],
                };
                value.to_string()
            })
            .into_owned()
    }
}

/// Genes joined by ", ", or [`NO_GENES_TEXT`]
pub fn gene_list_text(genes: &[String]) -> String {
    if genes.is_empty() {
        NO_GENES_TEXT.to_string()
    } else {
        genes.join(", ")
    }
}

/// Per-variant listing; empty when there are no variants
pub fn detailed_variant_info(variants: &[ProcessedVariant]) -> String {
    if variants.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = variants
        .iter()
        .map(|v| {
            format!(
                "- Variant: {}, Gene: {}, Predicted Effect: {}, Impact: {}, QUAL: {}",
                v.representation,
                or_not_available(&v.gene),
                v.consequence,
                or_not_available(&v.impact),
                v.quality
            )
        })
        .collect();
    format!("{}{}", DETAILED_INFO_HEADER, lines.join("\n"))
}

fn or_not_available(value: &str) -> &str {
    if value.is_empty() {
        GENE_NOT_AVAILABLE
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prioritize::{extract_notable_variants, PrioritizeConfig};
    use std::io::Write;

    fn extraction() -> Extraction {
        let vcf = "chr1\t100\trs1\tA\tG\t50\tPASS\tANN=G|missense_variant|MODERATE|BRCA1|x\n\
                   chr2\t200\t.\tC\tT\t99.5\tPASS\tANN=T|stop_gained||TP53|x\n";
        extract_notable_variants(vcf, &PrioritizeConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(PromptTemplate::new("").is_err());
        assert!(PromptTemplate::new("  \n").is_err());
        assert!(PromptTemplate::new("Age: ${age}").is_ok());
    }

    #[test]
    fn test_fill_all_placeholders() {
        let template = PromptTemplate::new(
            "${age}/${gender}\n${variantSummary}\n${geneList}${detailedVariantInfo}\n${age}",
        )
        .unwrap();
        let filled = template.fill(&Subject::default(), &extraction());

        assert!(filled.starts_with("25/female\n"));
        assert!(filled.contains(
            "chr2:200 C>T (Gene: TP53, Effect: stop_gained); rs1 A>G (Gene: BRCA1, Effect: missense_variant)"
        ));
        assert!(filled.contains("TP53, BRCA1"));
        assert!(filled.contains(
            "- Variant: chr2:200 C>T, Gene: TP53, Predicted Effect: stop_gained, Impact: N/A, QUAL: 99.5"
        ));
        assert!(filled.contains(
            "- Variant: rs1 A>G, Gene: BRCA1, Predicted Effect: missense_variant, Impact: MODERATE, QUAL: 50"
        ));
        // Every occurrence is replaced
        assert!(filled.ends_with("\n25"));
        assert!(!filled.contains("${"));
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        let template = PromptTemplate::new("${unknown} ${age}").unwrap();
        assert_eq!(template.fill(&Subject::default(), &extraction()), "${unknown} 25");
    }

    #[test]
    fn test_substituted_values_are_not_expanded() {
        let vcf = "chr1\t100\t${geneList}\tA\tG\t50\tPASS\tANN=G|missense_variant|MODERATE|BRCA1|x\n";
        let extraction = extract_notable_variants(vcf, &PrioritizeConfig::default()).unwrap();
        let template = PromptTemplate::new("${variantSummary}|${geneList}").unwrap();

        assert_eq!(
            template.fill(&Subject::default(), &extraction),
            "${geneList} A>G (Gene: BRCA1, Effect: missense_variant)|BRCA1"
        );
    }

    #[test]
    fn test_gene_list_text() {
        assert_eq!(gene_list_text(&[]), NO_GENES_TEXT);
        assert_eq!(
            gene_list_text(&["A".to_string(), "B".to_string()]),
            "A, B"
        );
    }

    #[test]
    fn test_detailed_variant_info_empty() {
        assert_eq!(detailed_variant_info(&[]), "");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Genes: ${{geneList}}").unwrap();
        let template = PromptTemplate::from_file(file.path()).unwrap();
        assert_eq!(template.as_str(), "Genes: ${geneList}");
    }

    #[test]
    fn test_from_missing_file() {
        let err = PromptTemplate::from_file(Path::new("/nonexistent/prompt.txt")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TemplateUnavailable);
    }

    #[test]
    fn test_load_falls_back_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();
        let template =
            PromptTemplate::load(Some("GENE_GUARD_TEST_UNSET_PROMPT_VAR"), file.path()).unwrap();
        assert_eq!(template.as_str(), "from file");
    }
}
