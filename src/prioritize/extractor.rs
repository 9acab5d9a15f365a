//! The extraction pipeline
//!
//! Each data line runs through a fixed sequence of gates; the first gate a
//! record fails rejects it and scanning moves to the next line:
//!
//! 1. at least eight columns
//! 2. usable CHROM/POS/REF/ALT
//! 3. QUAL at or above the minimum, FILTER is PASS or `.`
//! 4. population allele frequency (`AF`, `GMAF`, `gnomAD_AF`) not above the
//!    common-variant threshold
//! 5. at least one prioritized consequence in `ANN`/`EFF`
//!
//! Scanning stops as soon as `max_variants` records are accepted. The
//! accepted set is then ordered by consequence rank.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::vcf::{select_best_annotation, RawRecord};

use super::config::PrioritizeConfig;
use super::result::{
    is_known_gene, Extraction, ExtractionError, ExtractionResult, FilterCounts,
    ProcessedVariant, GENE_NOT_AVAILABLE,
};

/// INFO keys holding population allele frequency, in lookup order
pub const ALLELE_FREQUENCY_KEYS: [&str; 3] = ["AF", "GMAF", "gnomAD_AF"];

/// Separator between summary entries
pub const SUMMARY_SEPARATOR: &str = "; ";

/// Length of the line prefix included in log messages
const LOG_PREFIX_CHARS: usize = 30;

static SUMMARY_GENE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(Gene: ([^,]*), Effect: [^)]*\)").expect("valid regex"));

/// Why a single record was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    TooFewColumns,
    InvalidCoreFields,
    LowQuality,
    Filtered,
    CommonVariant,
    NoPrioritizedConsequence,
}

/// Extract and rank the notable variants of a VCF text.
///
/// # Example
///
/// ```
/// use gene_guard::prioritize::{extract_notable_variants, PrioritizeConfig};
///
/// let vcf = "chr1\t100\trs1\tA\tG\t50\tPASS\tANN=G|missense_variant|MODERATE|BRCA1|x\n";
/// let extraction = extract_notable_variants(vcf, &PrioritizeConfig::default()).unwrap();
/// assert_eq!(extraction.genes, vec!["BRCA1"]);
/// assert_eq!(extraction.summary, "rs1 A>G (Gene: BRCA1, Effect: missense_variant)");
/// ```
pub fn extract_notable_variants(content: &str, config: &PrioritizeConfig) -> ExtractionResult {
    if content.trim().is_empty() {
        debug!("Input is empty");
        return Err(ExtractionError::EmptyInput);
    }

    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .collect();
    if lines.is_empty() {
        debug!("No data lines after filtering headers");
        return Err(ExtractionError::NoDataLines);
    }
    debug!("Found {} data lines to process", lines.len());

    let mut accepted: Vec<ProcessedVariant> = Vec::new();
    let mut counts = FilterCounts::default();

    for line in lines {
        if accepted.len() >= config.max_variants {
            debug!("Reached report cap of {} variants", config.max_variants);
            break;
        }

        match evaluate_line(line, config) {
            Ok(variant) => {
                info!(
                    "Accepted variant {} with consequence {} in gene {}",
                    variant.representation, variant.consequence, variant.gene
                );
                accepted.push(variant);
            }
            Err(rejection) => {
                debug!("Skipping {:?}: {}...", rejection, line_prefix(line));
                match rejection {
                    Rejection::LowQuality | Rejection::Filtered => counts.quality_filter += 1,
                    Rejection::CommonVariant => counts.allele_frequency += 1,
                    Rejection::NoPrioritizedConsequence => counts.consequence += 1,
                    Rejection::TooFewColumns | Rejection::InvalidCoreFields => {}
                }
            }
        }
    }
    info!("Filter summary - {} ({} rejected)", counts, counts.total());

    if accepted.is_empty() {
        return Err(ExtractionError::NoQualifyingVariants { counts });
    }

    // Stable: equal ranks keep input order
    accepted.sort_by_key(|v| v.consequence);
    accepted.truncate(config.max_variants);

    let summary = accepted
        .iter()
        .map(ProcessedVariant::summary_entry)
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR);
    let genes = collect_genes(accepted.iter().map(|v| v.gene.as_str()));

    Ok(Extraction {
        variants: accepted,
        genes,
        summary,
    })
}

/// Run one data line through every gate
fn evaluate_line(line: &str, config: &PrioritizeConfig) -> Result<ProcessedVariant, Rejection> {
    let record = RawRecord::parse(line).ok_or(Rejection::TooFewColumns)?;

    if !record.has_valid_core_fields() {
        return Err(Rejection::InvalidCoreFields);
    }

    let quality = match record.quality_score() {
        Some(q) if q >= config.min_quality => q,
        _ => return Err(Rejection::LowQuality),
    };

    if !record.passes_filters() {
        return Err(Rejection::Filtered);
    }

    let info = record.info_map();

    if let Some(af) = info
        .first_value(&ALLELE_FREQUENCY_KEYS)
        .and_then(max_allele_frequency)
    {
        if af > config.max_allele_frequency {
            return Err(Rejection::CommonVariant);
        }
    }

    let best = select_best_annotation(&info).ok_or(Rejection::NoPrioritizedConsequence)?;

    let gene = if best.annotation.gene.is_empty() {
        GENE_NOT_AVAILABLE.to_string()
    } else {
        best.annotation.gene.to_string()
    };

    Ok(ProcessedVariant {
        representation: record.representation(),
        chrom: record.chrom.to_string(),
        pos: record.pos.to_string(),
        id: record.id.to_string(),
        reference: record.reference.to_string(),
        alternate: record.alternate.to_string(),
        quality,
        filter: record.filter.to_string(),
        gene,
        consequence: best.consequence,
        impact: best.annotation.impact.to_string(),
    })
}

/// Largest parseable frequency in a comma-separated list.
///
/// Unparseable and non-finite entries are ignored; `None` if nothing is left.
pub fn max_allele_frequency(value: &str) -> Option<f64> {
    value
        .split(',')
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
}

/// Distinct known genes in first-seen order
pub fn collect_genes<'a, I>(genes: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for gene in genes {
        if is_known_gene(gene) && !out.iter().any(|g| g == gene) {
            out.push(gene.to_string());
        }
    }
    out
}

/// Gene names mentioned in a summary string, in order, with repeats
pub fn genes_in_summary(summary: &str) -> Vec<&str> {
    SUMMARY_GENE
        .captures_iter(summary)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

fn line_prefix(line: &str) -> String {
    line.chars().take(LOG_PREFIX_CHARS).collect()
}
