#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_aggregator::models::SearchRequest;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<SearchRequest>(data) {
        let _ = request.combined_query();
        let _ = request.year_range();
        assert!(request.per_provider_limit() <= request.effective_limit());
    }
});
