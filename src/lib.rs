// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! gene-guard: annotated VCF prioritization for narrative risk reports
//!
//! Reads the text of a SnpEff/VEP-annotated VCF, keeps the high-quality rare
//! variants with a damaging consequence, ranks them by severity and turns the
//! top few into a prompt for a narrative generator.
//!
//! # Example
//!
//! ```
//! use gene_guard::{extract_notable_variants, PrioritizeConfig};
//!
//! let vcf = "chr1\t100\trs1\tA\tG\t50\tPASS\tAF=0.001;ANN=G|missense_variant|MODERATE|BRCA1|ENSG00000012048\n";
//! let extraction = extract_notable_variants(vcf, &PrioritizeConfig::default()).unwrap();
//!
//! assert_eq!(extraction.genes, vec!["BRCA1"]);
//! assert_eq!(
//!     extraction.summary,
//!     "rs1 A>G (Gene: BRCA1, Effect: missense_variant)"
//! );
//! ```

pub mod error;
pub mod narrative;
pub mod prioritize;
pub mod prompt;
#[cfg(feature = "web-service")]
pub mod service;
pub mod vcf;

// Re-export commonly used types
pub use error::{ErrorCode, GeneGuardError};
pub use prioritize::{
    extract_notable_variants, Extraction, ExtractionError, ExtractionResult, PrioritizeConfig,
    ProcessedVariant,
};
pub use prompt::{PromptTemplate, Subject};
pub use vcf::Consequence;

/// Result type alias for gene-guard operations
pub type Result<T> = std::result::Result<T, GeneGuardError>;
