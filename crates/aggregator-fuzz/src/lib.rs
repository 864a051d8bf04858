//! Fuzzing library for paper-aggregator.
//!
//! This crate provides fuzzing targets for provider record parsing, search
//! request decoding and the merge & rank engine.
//!
//! # Usage
//!
//! ```bash
//! cd crates/aggregator-fuzz
//! cargo +nightly fuzz run fuzz_record_parse -- -max_total_time=60
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use paper_aggregator::client::HttpClient;
use paper_aggregator::config::Config;
use paper_aggregator::providers::{CrossRefProvider, SemanticScholarProvider};

pub use paper_aggregator::{models, providers, rank};

/// Both adapters, built once. They never touch the network when only
/// `parse` is called.
pub fn providers_for_parsing() -> &'static (SemanticScholarProvider, CrossRefProvider) {
    static PROVIDERS: OnceLock<(SemanticScholarProvider, CrossRefProvider)> = OnceLock::new();
    PROVIDERS.get_or_init(|| {
        let config = Config::for_testing("http://127.0.0.1:1");
        let client = HttpClient::new(Duration::from_secs(1), Duration::from_secs(1))
            .expect("client without network access");
        (
            SemanticScholarProvider::new(client.clone(), &config),
            CrossRefProvider::new(client, &config),
        )
    })
}
