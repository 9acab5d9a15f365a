//! Fuzz target for variant extraction
//!
//! Feeds arbitrary byte strings to the extractor to find panics on malformed
//! uploads.

#![no_main]

use gene_guard::prioritize::{extract_notable_variants, PrioritizeConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let config = PrioritizeConfig::default();
        if let Ok(extraction) = extract_notable_variants(input, &config) {
            assert!(extraction.variants.len() <= config.max_variants);
        }
    }
});
