//! Thresholds for variant prioritization

use serde::{Deserialize, Serialize};

use crate::error::GeneGuardError;

/// Default minimum QUAL for a record to be considered
pub const DEFAULT_MIN_QUALITY: f64 = 30.0;

/// Default population allele frequency above which a variant is common
pub const DEFAULT_MAX_ALLELE_FREQUENCY: f64 = 0.01;

/// Default number of variants to report
pub const DEFAULT_MAX_VARIANTS: usize = 5;

/// Prioritization thresholds
///
/// # Example
///
/// ```
/// use gene_guard::prioritize::PrioritizeConfig;
///
/// let config = PrioritizeConfig::default().with_max_variants(10);
/// assert_eq!(config.min_quality, 30.0);
/// assert_eq!(config.max_variants, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizeConfig {
    /// Records with QUAL below this are skipped
    pub min_quality: f64,
    /// Records with a population AF strictly above this are skipped
    pub max_allele_frequency: f64,
    /// Scanning stops once this many variants are accepted
    pub max_variants: usize,
}

impl Default for PrioritizeConfig {
    fn default() -> Self {
        Self {
            min_quality: DEFAULT_MIN_QUALITY,
            max_allele_frequency: DEFAULT_MAX_ALLELE_FREQUENCY,
            max_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

impl PrioritizeConfig {
    /// Set the minimum quality
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality;
        self
    }

    /// Set the common-variant allele frequency threshold
    pub fn with_max_allele_frequency(mut self, max_allele_frequency: f64) -> Self {
        self.max_allele_frequency = max_allele_frequency;
        self
    }

    /// Set the report cap
    pub fn with_max_variants(mut self, max_variants: usize) -> Self {
        self.max_variants = max_variants;
        self
    }

    /// Validate threshold ranges
    pub fn validate(&self) -> Result<(), GeneGuardError> {
        if !self.min_quality.is_finite() || self.min_quality < 0.0 {
            return Err(GeneGuardError::Config {
                msg: format!("min_quality must be a non-negative number, got {}", self.min_quality),
            });
        }
        if !(0.0..=1.0).contains(&self.max_allele_frequency) {
            return Err(GeneGuardError::Config {
                msg: format!(
                    "max_allele_frequency must be between 0 and 1, got {}",
                    self.max_allele_frequency
                ),
            });
        }
        if self.max_variants == 0 {
            return Err(GeneGuardError::Config {
                msg: "max_variants must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
