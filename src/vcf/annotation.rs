//! SnpEff/VEP-style effect annotations
//!
//! `ANN` (and the older `EFF`) INFO values hold one comma-separated entry
//! per predicted effect. Each entry is pipe-separated:
//!
//! ```text
//! Allele | Consequence(s) | Impact | Gene | ...
//! G      | missense_variant&splice_region_variant | MODERATE | BRCA1 | ...
//! ```

use serde::{Deserialize, Serialize};

use super::record::InfoMap;

/// INFO keys carrying effect annotations, in lookup order
pub const ANNOTATION_KEYS: [&str; 2] = ["ANN", "EFF"];

/// Separator between consequence terms within one entry
pub const CONSEQUENCE_SEPARATOR: char = '&';

/// Minimum number of pipe-separated fields for an entry to be considered
const MIN_ANNOTATION_FIELDS: usize = 5;

/// Consequences worth reporting, ordered from most to least severe.
///
/// The declaration order is the ranking: loss-of-function first, then
/// in-frame and missense changes, then splice-region and silent changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    TranscriptAblation,
    SpliceAcceptorVariant,
    SpliceDonorVariant,
    StopGained,
    FrameshiftVariant,
    StopLost,
    StartLost,
    TranscriptAmplification,
    InframeInsertion,
    InframeDeletion,
    MissenseVariant,
    ProteinAlteringVariant,
    SpliceRegionVariant,
    IncompleteTerminalCodonVariant,
    StartRetainedVariant,
    StopRetainedVariant,
    SynonymousVariant,
}

impl Consequence {
    /// All prioritized consequences in rank order
    pub const ALL: [Consequence; 17] = [
        Consequence::TranscriptAblation,
        Consequence::SpliceAcceptorVariant,
        Consequence::SpliceDonorVariant,
        Consequence::StopGained,
        Consequence::FrameshiftVariant,
        Consequence::StopLost,
        Consequence::StartLost,
        Consequence::TranscriptAmplification,
        Consequence::InframeInsertion,
        Consequence::InframeDeletion,
        Consequence::MissenseVariant,
        Consequence::ProteinAlteringVariant,
        Consequence::SpliceRegionVariant,
        Consequence::IncompleteTerminalCodonVariant,
        Consequence::StartRetainedVariant,
        Consequence::StopRetainedVariant,
        Consequence::SynonymousVariant,
    ];

    /// Get the Sequence Ontology term for this consequence
    pub fn so_term(&self) -> &'static str {
        match self {
            Consequence::TranscriptAblation => "transcript_ablation",
            Consequence::SpliceAcceptorVariant => "splice_acceptor_variant",
            Consequence::SpliceDonorVariant => "splice_donor_variant",
            Consequence::StopGained => "stop_gained",
            Consequence::FrameshiftVariant => "frameshift_variant",
            Consequence::StopLost => "stop_lost",
            Consequence::StartLost => "start_lost",
            Consequence::TranscriptAmplification => "transcript_amplification",
            Consequence::InframeInsertion => "inframe_insertion",
            Consequence::InframeDeletion => "inframe_deletion",
            Consequence::MissenseVariant => "missense_variant",
            Consequence::ProteinAlteringVariant => "protein_altering_variant",
            Consequence::SpliceRegionVariant => "splice_region_variant",
            Consequence::IncompleteTerminalCodonVariant => "incomplete_terminal_codon_variant",
            Consequence::StartRetainedVariant => "start_retained_variant",
            Consequence::StopRetainedVariant => "stop_retained_variant",
            Consequence::SynonymousVariant => "synonymous_variant",
        }
    }

    /// Look up a Sequence Ontology term; `None` for terms that are not prioritized
    pub fn from_so_term(term: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.so_term() == term)
    }

    /// Position in the priority list (0 = most severe)
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Consequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.so_term())
    }
}

/// One decoded annotation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    /// Allele the effect applies to
    pub allele: &'a str,
    /// Consequence terms joined by `&`
    pub consequences: &'a str,
    /// Impact label (HIGH, MODERATE, LOW, MODIFIER)
    pub impact: &'a str,
    /// Gene name, possibly empty
    pub gene: &'a str,
}

impl<'a> Annotation<'a> {
    /// Decode one pipe-separated entry; entries with too few fields are ignored
    pub fn parse(entry: &'a str) -> Option<Self> {
        let fields: Vec<&str> = entry.split('|').collect();
        if fields.len() < MIN_ANNOTATION_FIELDS {
            return None;
        }
        Some(Annotation {
            allele: fields[0],
            consequences: fields[1],
            impact: fields[2],
            gene: fields[3],
        })
    }

    /// Prioritized consequence terms, in the order they are written
    pub fn prioritized_terms(&self) -> impl Iterator<Item = Consequence> + 'a {
        self.consequences
            .split(CONSEQUENCE_SEPARATOR)
            .filter_map(Consequence::from_so_term)
    }
}

/// The highest-priority annotation found on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestAnnotation<'a> {
    /// The winning entry
    pub annotation: Annotation<'a>,
    /// The term within the entry that won
    pub consequence: Consequence,
}

/// Pick the highest-priority annotation from a record's INFO.
///
/// Scans every entry and term in order and keeps the first one seen at the
/// lowest rank; a later candidate only replaces it with a strictly lower
/// rank. Returns `None` when no annotation key is present or no term is
/// prioritized.
pub fn select_best_annotation<'a>(info: &InfoMap<'a>) -> Option<BestAnnotation<'a>> {
    let value = info.first_value(&ANNOTATION_KEYS)?;

    value
        .split(',')
        .filter_map(Annotation::parse)
        .flat_map(|annotation| {
            annotation
                .prioritized_terms()
                .map(move |consequence| BestAnnotation {
                    annotation,
                    consequence,
                })
        })
        .fold(None, |best: Option<BestAnnotation<'a>>, candidate| match best {
            Some(current) if current.consequence <= candidate.consequence => Some(current),
            _ => Some(candidate),
        })
}
