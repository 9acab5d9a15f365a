//! Property-based tests for variant extraction
//!
//! Random VCF bodies are assembled from annotated records and checked against
//! the invariants of the prioritizer.

use gene_guard::prioritize::{
    collect_genes, extract_notable_variants, genes_in_summary, ExtractionError,
    PrioritizeConfig, GENE_NOT_AVAILABLE,
};
use gene_guard::Consequence;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Strategies
// =============================================================================

/// Consequence terms, prioritized or not
fn consequence_term() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::sample::select(Consequence::ALL.to_vec()).prop_map(|c| c.so_term().to_string()),
        1 => Just("intron_variant".to_string()),
        1 => Just("upstream_gene_variant".to_string()),
    ]
}

/// Gene names, including the empty gene
fn gene() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("BRCA1".to_string()),
        Just("BRCA2".to_string()),
        Just("TP53".to_string()),
        Just("CFTR".to_string()),
        "[A-Z][A-Z0-9]{1,6}",
    ]
}

fn annotation_entry() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(consequence_term(), 1..3),
        gene(),
    )
        .prop_map(|(terms, gene)| format!("G|{}|MODERATE|{}|ENSG0001", terms.join("&"), gene))
}

fn quality() -> impl Strategy<Value = String> {
    prop_oneof![
        (0.0f64..100.0).prop_map(|q| format!("{:.1}", q)),
        Just(".".to_string()),
    ]
}

fn filter() -> impl Strategy<Value = &'static str> {
    prop_oneof![4 => Just("PASS"), 1 => Just("."), 1 => Just("LowQual")]
}

fn allele_frequency() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(0.0f64..0.05)
}

/// A full data line
fn data_line() -> impl Strategy<Value = String> {
    (
        1u32..1_000_000,
        quality(),
        filter(),
        allele_frequency(),
        proptest::collection::vec(annotation_entry(), 0..4),
    )
        .prop_map(|(pos, qual, filter, af, entries)| {
            let mut info: Vec<String> = Vec::new();
            if let Some(af) = af {
                info.push(format!("AF={}", af));
            }
            if !entries.is_empty() {
                info.push(format!("ANN={}", entries.join(",")));
            }
            if info.is_empty() {
                info.push(".".to_string());
            }
            format!(
                "chr1\t{}\trs{}\tA\tG\t{}\t{}\t{}",
                pos,
                pos,
                qual,
                filter,
                info.join(";")
            )
        })
}

fn comment_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "##[a-zA-Z=0-9 ]{0,20}",
        "#[a-zA-Z\t ]{0,20}",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Header and blank lines alone never yield variants
    #[test]
    fn prop_comment_only_input_has_no_data_lines(
        first in "##[a-z]{1,10}",
        rest in proptest::collection::vec(comment_line(), 0..10),
    ) {
        let mut text = first;
        for line in rest {
            text.push('\n');
            text.push_str(&line);
        }
        prop_assert_eq!(
            extract_notable_variants(&text, &PrioritizeConfig::default()),
            Err(ExtractionError::NoDataLines)
        );
    }

    /// Accepted variants respect every threshold, the cap and the ordering
    #[test]
    fn prop_accepted_variants_satisfy_invariants(
        lines in proptest::collection::vec(data_line(), 1..30),
        max_variants in 1usize..8,
    ) {
        let config = PrioritizeConfig::default().with_max_variants(max_variants);
        let text = lines.join("\n");

        match extract_notable_variants(&text, &config) {
            Ok(extraction) => {
                prop_assert!(!extraction.variants.is_empty());
                prop_assert!(extraction.variants.len() <= max_variants);

                for v in &extraction.variants {
                    prop_assert!(v.quality >= config.min_quality);
                }

                for pair in extraction.variants.windows(2) {
                    prop_assert!(pair[0].consequence <= pair[1].consequence);
                }

                let mut seen = std::collections::HashSet::new();
                for g in &extraction.genes {
                    prop_assert!(g != GENE_NOT_AVAILABLE);
                    prop_assert!(seen.insert(g.clone()), "duplicate gene {}", g);
                }

                let entries = extraction.summary.split("; ").count();
                prop_assert_eq!(entries, extraction.variants.len());
            }
            Err(err) => {
                prop_assert!(
                    matches!(err, ExtractionError::NoQualifyingVariants { .. }),
                    "unexpected error {:?}",
                    err
                );
            }
        }
    }

    /// Genes recovered from the summary match the gene set
    #[test]
    fn prop_gene_extraction_is_idempotent(
        lines in proptest::collection::vec(data_line(), 1..30),
    ) {
        let text = lines.join("\n");
        if let Ok(extraction) = extract_notable_variants(&text, &PrioritizeConfig::default()) {
            let from_summary = collect_genes(genes_in_summary(&extraction.summary));
            prop_assert_eq!(&from_summary, &extraction.genes);
            let again = collect_genes(from_summary.iter().map(String::as_str));
            prop_assert_eq!(again, from_summary);
        }
    }

    /// Arbitrary text never panics
    #[test]
    fn prop_arbitrary_input_does_not_panic(text in "\\PC{0,400}") {
        let _ = extract_notable_variants(&text, &PrioritizeConfig::default());
    }
}
