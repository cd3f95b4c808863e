#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use resources::MemoryLoader;
use suite::{Errata, TestSpec, parse_suite};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Arbitrary text must produce a suite or an error, never a panic.
        let parsed = parse_suite(
            text,
            "/xmlconf",
            Arc::new(MemoryLoader::new()),
            Arc::new(Errata::builtin()),
        );
        if let Ok(suite) = parsed {
            for test in suite.tests() {
                let _ = test.sections();
                let _ = test.resolved_uri();
            }
        }
    }
});
