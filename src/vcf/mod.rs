//! VCF (Variant Call Format) support
//!
//! This module provides lenient, header-free parsing of VCF data lines and
//! decoding of SnpEff/VEP effect annotations carried in the INFO column.

mod annotation;
mod record;

pub use annotation::{
    select_best_annotation, Annotation, BestAnnotation, Consequence, ANNOTATION_KEYS,
    CONSEQUENCE_SEPARATOR,
};
pub use record::{InfoMap, InfoValue, RawRecord, MISSING, REQUIRED_COLUMNS};
