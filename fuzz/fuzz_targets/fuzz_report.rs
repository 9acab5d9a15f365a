//! Fuzz target for narrative reply parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Don't fuzz extremely long inputs - diminishing returns
        if input.len() > 4096 {
            return;
        }
        let _ = gene_guard::narrative::parse_risk_report(input);
    }
});
