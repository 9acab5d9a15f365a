//! Variant extraction and prioritization
//!
//! Turns the text of an annotated VCF into a short, ranked list of variants
//! worth describing, plus the distinct genes they touch and a one-line
//! summary for prompting.
//!
//! # Example
//!
//! ```
//! use gene_guard::prioritize::{extract_notable_variants, ExtractionError, PrioritizeConfig};
//!
//! let config = PrioritizeConfig::default();
//! assert_eq!(
//!     extract_notable_variants("##fileformat=VCFv4.2\n", &config),
//!     Err(ExtractionError::NoDataLines)
//! );
//! ```

mod config;
mod extractor;
mod result;

pub use config::{
    PrioritizeConfig, DEFAULT_MAX_ALLELE_FREQUENCY, DEFAULT_MAX_VARIANTS, DEFAULT_MIN_QUALITY,
};
pub use extractor::{
    collect_genes, extract_notable_variants, genes_in_summary, max_allele_frequency,
    ALLELE_FREQUENCY_KEYS, SUMMARY_SEPARATOR,
};
pub use result::{
    is_known_gene, Extraction, ExtractionError, ExtractionResult, FilterCounts,
    ProcessedVariant, GENE_NOT_AVAILABLE,
};
