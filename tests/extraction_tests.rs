//! Integration tests for variant extraction and prioritization

use gene_guard::prioritize::{
    collect_genes, extract_notable_variants, genes_in_summary, ExtractionError, FilterCounts,
    PrioritizeConfig, GENE_NOT_AVAILABLE,
};
use gene_guard::Consequence;
use rstest::rstest;

const HEADER: &str = "##fileformat=VCFv4.2\n\
##INFO=<ID=ANN,Number=.,Type=String,Description=\"Functional annotations\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

/// Build a data line at chr1 with the given ID, QUAL, FILTER and INFO
fn record(id: &str, qual: &str, filter: &str, info: &str) -> String {
    format!("chr1\t100\t{}\tA\tG\t{}\t{}\t{}", id, qual, filter, info)
}

fn ann(consequence: &str, gene: &str) -> String {
    format!("ANN=G|{}|MODERATE|{}|ENSG0001|transcript", consequence, gene)
}

fn vcf(lines: &[String]) -> String {
    let mut text = HEADER.to_string();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn config() -> PrioritizeConfig {
    PrioritizeConfig::default()
}

// ==================== Whole-input errors ====================

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\n\t\n")]
fn test_blank_input_is_empty(#[case] input: &str) {
    assert_eq!(
        extract_notable_variants(input, &config()),
        Err(ExtractionError::EmptyInput)
    );
}

#[rstest]
#[case("##fileformat=VCFv4.2\n")]
#[case("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\n   \n")]
#[case(HEADER)]
fn test_header_only_input_has_no_data_lines(#[case] input: &str) {
    assert_eq!(
        extract_notable_variants(input, &config()),
        Err(ExtractionError::NoDataLines)
    );
}

#[test]
fn test_all_rejected_reports_counts() {
    let input = vcf(&[
        record("rs1", "10", "PASS", &ann("missense_variant", "BRCA1")),
        record("rs2", "50", "LowQual", &ann("missense_variant", "BRCA1")),
        record("rs3", "50", "PASS", &format!("AF=0.5;{}", ann("stop_gained", "TP53"))),
        record("rs4", "50", "PASS", &ann("intron_variant", "TP53")),
        record("rs5", "50", "PASS", "DP=10"),
        "chr1\t100\trs6\tA".to_string(),
    ]);

    let err = extract_notable_variants(&input, &config()).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::NoQualifyingVariants {
            counts: FilterCounts {
                quality_filter: 2,
                allele_frequency: 1,
                consequence: 2,
            }
        }
    );
    assert!(err
        .to_string()
        .contains("Quality/Filter skips: 2, AF skips: 1, Consequence skips: 2"));
}

// ==================== Single-record gates ====================

#[test]
fn test_missense_record_without_af_is_accepted() {
    let input = "chr1\t100\trs1\tA\tG\t50\tPASS\tANN=G|missense_variant|MODERATE|BRCA1|ENSG00000012048\n";
    let extraction = extract_notable_variants(input, &config()).unwrap();

    assert_eq!(extraction.variants.len(), 1);
    let variant = &extraction.variants[0];
    assert_eq!(variant.gene, "BRCA1");
    assert_eq!(variant.consequence, Consequence::MissenseVariant);
    assert_eq!(variant.impact, "MODERATE");
    assert_eq!(variant.quality, 50.0);
    assert_eq!(extraction.genes, vec!["BRCA1"]);
}

#[rstest]
#[case("10", false)]
#[case("29.9", false)]
#[case("30", true)]
#[case("30.0", true)]
#[case("99", true)]
#[case(".", false)]
#[case("NaN", false)]
#[case("high", false)]
#[case("inf", false)]
#[case("infinity", false)]
#[case("+inf", false)]
fn test_quality_threshold(#[case] qual: &str, #[case] accepted: bool) {
    let input = vcf(&[record("rs1", qual, "PASS", &ann("missense_variant", "BRCA1"))]);
    assert_eq!(extract_notable_variants(&input, &config()).is_ok(), accepted);
}

#[rstest]
#[case("PASS", true)]
#[case("pass", true)]
#[case(".", true)]
#[case("LowQual", false)]
#[case("q10;s50", false)]
fn test_filter_status(#[case] filter: &str, #[case] accepted: bool) {
    let input = vcf(&[record("rs1", "50", filter, &ann("missense_variant", "BRCA1"))]);
    assert_eq!(extract_notable_variants(&input, &config()).is_ok(), accepted);
}

#[rstest]
#[case("AF=0.01", true)]
#[case("AF=0.011", false)]
#[case("AF=0.5", false)]
#[case("AF=0.001,0.2", false)]
#[case("AF=0.001,.", true)]
#[case("AF=.", true)]
#[case("GMAF=0.3", false)]
#[case("gnomAD_AF=0.3", false)]
#[case("AF=0.001;GMAF=0.3", true)]
#[case("DP=30", true)]
#[case("AF=inf", true)]
#[case("AF=infinity,0.2", false)]
#[case("AF=+inf;GMAF=0.001", true)]
fn test_allele_frequency_threshold(#[case] af: &str, #[case] accepted: bool) {
    let info = format!("{};{}", af, ann("stop_gained", "TP53"));
    let input = vcf(&[record("rs1", "50", "PASS", &info)]);
    let result = extract_notable_variants(&input, &config());
    assert_eq!(result.is_ok(), accepted, "AF field {:?}", af);
}

#[rstest]
#[case("chr1\t100\trs1\t.\tG\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
#[case("chr1\t100\trs1\tA\t.\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
#[case("chr1\t100\trs1\tA\t*\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
#[case("chr1\t100\trs1\tA\t<DEL>\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
#[case("\t100\trs1\tA\tG\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
#[case("chr1\t\trs1\tA\tG\t50\tPASS\tANN=G|missense_variant|M|BRCA1|x")]
fn test_invalid_core_fields_are_skipped_silently(#[case] line: &str) {
    let err = extract_notable_variants(line, &config()).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::NoQualifyingVariants {
            counts: FilterCounts::default()
        }
    );
}

#[test]
fn test_eff_used_when_ann_absent() {
    let input = vcf(&[record(
        "rs1",
        "50",
        "PASS",
        "EFF=G|frameshift_variant|HIGH|CFTR|x",
    )]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].consequence, Consequence::FrameshiftVariant);
    assert_eq!(extraction.variants[0].gene, "CFTR");
}

#[test]
fn test_short_annotation_entries_are_ignored() {
    let input = vcf(&[record(
        "rs1",
        "50",
        "PASS",
        "ANN=G|stop_gained|HIGH|TP53,G|missense_variant|MODERATE|BRCA1|x",
    )]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].consequence, Consequence::MissenseVariant);
    assert_eq!(extraction.variants[0].gene, "BRCA1");
}

#[test]
fn test_best_annotation_across_entries_and_terms() {
    let input = vcf(&[record(
        "rs1",
        "50",
        "PASS",
        "ANN=G|synonymous_variant|LOW|GENEA|x,G|intron_variant&splice_donor_variant|HIGH|GENEB|x",
    )]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].consequence, Consequence::SpliceDonorVariant);
    assert_eq!(extraction.variants[0].gene, "GENEB");
    assert_eq!(extraction.variants[0].impact, "HIGH");
}

#[test]
fn test_equal_rank_annotations_keep_first() {
    let input = vcf(&[record(
        "rs1",
        "50",
        "PASS",
        "ANN=G|missense_variant|MODERATE|FIRST|x,G|missense_variant|MODERATE|SECOND|x",
    )]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].gene, "FIRST");
}

#[test]
fn test_missing_gene_uses_placeholder() {
    let input = vcf(&[record("rs1", "50", "PASS", "ANN=G|missense_variant|MODERATE||x")]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].gene, GENE_NOT_AVAILABLE);
    assert!(extraction.genes.is_empty());
    assert_eq!(
        extraction.summary,
        "rs1 A>G (Gene: N/A, Effect: missense_variant)"
    );
}

#[test]
fn test_representation_falls_back_to_locus() {
    let input = vcf(&[record(".", "50", "PASS", &ann("missense_variant", "BRCA1"))]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].representation, "chr1:100 A>G");
}

#[test]
fn test_crlf_line_endings() {
    let input = format!(
        "##fileformat=VCFv4.2\r\n{}\r\n",
        record("rs1", "50", "PASS", &ann("missense_variant", "BRCA1"))
    );
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants[0].gene, "BRCA1");
}

// ==================== Ranking and cap ====================

#[test]
fn test_sorted_by_priority_with_stable_ties() {
    let input = vcf(&[
        record("rs1", "50", "PASS", &ann("missense_variant", "GENE1")),
        record("rs2", "50", "PASS", &ann("synonymous_variant", "GENE2")),
        record("rs3", "50", "PASS", &ann("stop_gained", "GENE3")),
        record("rs4", "50", "PASS", &ann("missense_variant", "GENE4")),
    ]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    let ids: Vec<&str> = extraction.variants.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["rs3", "rs1", "rs4", "rs2"]);
    assert_eq!(extraction.genes, vec!["GENE3", "GENE1", "GENE4", "GENE2"]);
}

/// Scanning stops at the cap: a more severe variant after the first five
/// accepted records is never considered.
#[test]
fn test_scan_stops_at_cap() {
    let mut lines: Vec<String> = (1..=5)
        .map(|i| {
            record(
                &format!("rs{}", i),
                "50",
                "PASS",
                &ann("synonymous_variant", &format!("GENE{}", i)),
            )
        })
        .collect();
    lines.push(record("rs6", "50", "PASS", &ann("transcript_ablation", "LATE")));
    let input = vcf(&lines);

    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants.len(), 5);
    assert!(extraction
        .variants
        .iter()
        .all(|v| v.consequence == Consequence::SynonymousVariant));
    assert!(!extraction.genes.contains(&"LATE".to_string()));
}

#[test]
fn test_cap_is_configurable() {
    let lines: Vec<String> = (1..=4)
        .map(|i| record(&format!("rs{}", i), "50", "PASS", &ann("missense_variant", "BRCA1")))
        .collect();
    let input = vcf(&lines);

    let extraction =
        extract_notable_variants(&input, &config().with_max_variants(2)).unwrap();
    assert_eq!(extraction.variants.len(), 2);
    assert_eq!(extraction.genes, vec!["BRCA1"]);
}

#[test]
fn test_rejected_records_do_not_count_toward_cap() {
    let mut lines: Vec<String> = (1..=10)
        .map(|i| record(&format!("rs{}", i), "5", "PASS", &ann("stop_gained", "LOWQ")))
        .collect();
    lines.push(record("rs99", "50", "PASS", &ann("missense_variant", "BRCA2")));
    let input = vcf(&lines);

    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.variants.len(), 1);
    assert_eq!(extraction.variants[0].id, "rs99");
}

// ==================== Summary and genes ====================

#[test]
fn test_summary_format() {
    let input = vcf(&[
        record("rs1", "50", "PASS", &ann("missense_variant", "BRCA1")),
        record("rs2", "50", "PASS", &ann("frameshift_variant", "TP53")),
    ]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(
        extraction.summary,
        "rs2 A>G (Gene: TP53, Effect: frameshift_variant); rs1 A>G (Gene: BRCA1, Effect: missense_variant)"
    );
}

#[test]
fn test_genes_deduplicated_in_first_seen_order() {
    let input = vcf(&[
        record("rs1", "50", "PASS", &ann("missense_variant", "BRCA1")),
        record("rs2", "50", "PASS", &ann("missense_variant", "TP53")),
        record("rs3", "50", "PASS", &ann("missense_variant", "BRCA1")),
        record("rs4", "50", "PASS", "ANN=G|missense_variant|MODERATE||x"),
    ]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();
    assert_eq!(extraction.genes, vec!["BRCA1", "TP53"]);
}

#[test]
fn test_gene_extraction_from_summary_is_idempotent() {
    let input = vcf(&[
        record("rs1", "50", "PASS", &ann("stop_gained", "BRCA1")),
        record("rs2", "50", "PASS", &ann("missense_variant", "TP53")),
        record("rs3", "50", "PASS", &ann("missense_variant", "BRCA1")),
        record("rs4", "50", "PASS", "ANN=G|synonymous_variant|LOW||x"),
    ]);
    let extraction = extract_notable_variants(&input, &config()).unwrap();

    let from_summary = collect_genes(genes_in_summary(&extraction.summary));
    assert_eq!(from_summary, extraction.genes);

    let again = collect_genes(from_summary.iter().map(String::as_str));
    assert_eq!(again, from_summary);
}
