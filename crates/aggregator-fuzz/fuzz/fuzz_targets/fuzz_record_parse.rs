#![no_main]

use aggregator_fuzz::providers::PaperProvider;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only valid JSON reaches the adapters; parse must return Ok or Err, never panic
    if let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) {
        let (s2, crossref) = aggregator_fuzz::providers_for_parsing();
        let _ = s2.parse(raw.clone());
        let _ = crossref.parse(raw);
    }
});
