//! Output types of variant extraction

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorCode;
use crate::vcf::Consequence;

/// Gene placeholder used when the winning annotation names no gene
pub const GENE_NOT_AVAILABLE: &str = "N/A";

/// Check a gene name is set and is not the [`GENE_NOT_AVAILABLE`] placeholder
pub fn is_known_gene(gene: &str) -> bool {
    !gene.is_empty() && gene != GENE_NOT_AVAILABLE
}

/// A variant that passed every filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedVariant {
    /// Display form, e.g. "rs123 A>G" or "chr1:100 A>G"
    pub representation: String,
    pub chrom: String,
    pub pos: String,
    pub id: String,
    pub reference: String,
    pub alternate: String,
    /// Parsed QUAL
    pub quality: f64,
    pub filter: String,
    /// Gene of the winning annotation, or [`GENE_NOT_AVAILABLE`]
    pub gene: String,
    /// Highest-priority consequence on the record
    pub consequence: Consequence,
    /// Impact label of the winning annotation
    pub impact: String,
}

impl ProcessedVariant {
    /// Summary entry, e.g. "rs1 A>G (Gene: BRCA1, Effect: missense_variant)"
    pub fn summary_entry(&self) -> String {
        format!(
            "{} (Gene: {}, Effect: {})",
            self.representation, self.gene, self.consequence
        )
    }
}

/// Per-stage rejection counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    /// Rejected for low/unparseable QUAL or a failing FILTER
    pub quality_filter: usize,
    /// Rejected as a common variant
    pub allele_frequency: usize,
    /// Rejected for lacking a prioritized consequence
    pub consequence: usize,
}

impl FilterCounts {
    /// Total records rejected by filters
    pub fn total(&self) -> usize {
        self.quality_filter + self.allele_frequency + self.consequence
    }
}

impl std::fmt::Display for FilterCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Quality/Filter skips: {}, AF skips: {}, Consequence skips: {}",
            self.quality_filter, self.allele_frequency, self.consequence
        )
    }
}

/// Successful extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Accepted variants, most severe first
    pub variants: Vec<ProcessedVariant>,
    /// Distinct known genes in first-seen order
    pub genes: Vec<String>,
    /// `; `-joined summary entries
    pub summary: String,
}

/// Why extraction produced nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input was empty or whitespace only
    #[error("File is empty or contains no processable content.")]
    EmptyInput,

    /// Input contained only comment/header and blank lines
    #[error("No data lines found in VCF file after filtering headers.")]
    NoDataLines,

    /// Every data line was rejected
    #[error("No variants passed all filtering criteria. ({counts})")]
    NoQualifyingVariants { counts: FilterCounts },
}

impl ExtractionError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractionError::EmptyInput => ErrorCode::EmptyInput,
            ExtractionError::NoDataLines => ErrorCode::NoDataLines,
            ExtractionError::NoQualifyingVariants { .. } => ErrorCode::NoQualifyingVariants,
        }
    }
}

/// Result of extraction; the error and success branches are exclusive
pub type ExtractionResult = Result<Extraction, ExtractionError>;
