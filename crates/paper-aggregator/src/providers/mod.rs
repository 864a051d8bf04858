//! Provider adapters.
//!
//! Each adapter turns the combined query text into provider-native request
//! parameters, performs one HTTP call and normalizes each raw record into a
//! [`CanonicalPaper`]. The provider set is fixed: see [`register_all_providers`].
//!
//! Failure containment happens here:
//! - a failed call (transport, status, undecodable body) logs and yields no records
//! - a malformed record is skipped; its siblings are still returned

mod crossref;
mod semantic_scholar;

pub use crossref::CrossRefProvider;
pub use semantic_scholar::SemanticScholarProvider;

use std::sync::Arc;

use serde_json::Value;

use crate::client::HttpClient;
use crate::config::Config;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{CanonicalPaper, PaperSource};

/// An external academic search API.
#[async_trait::async_trait]
pub trait PaperProvider: Send + Sync {
    /// Which source tag this adapter stamps on its records.
    fn source(&self) -> PaperSource;

    /// Provider-native query parameters for `query`, asking for `limit` records.
    fn build_params(&self, query: &str, limit: usize) -> Vec<(String, String)>;

    /// Perform the network call and return the raw record list.
    async fn fetch(&self, query: &str, limit: usize) -> ProviderResult<Vec<Value>>;

    /// Normalize one raw record.
    fn parse(&self, raw: Value) -> ProviderResult<CanonicalPaper>;

    /// Fetch and parse, surfacing provider-level failures.
    ///
    /// Record failures drop only the offending record.
    async fn try_search(&self, query: &str, limit: usize) -> ProviderResult<Vec<CanonicalPaper>> {
        let records = self.fetch(query, limit).await?;
        Ok(parse_records(self, records))
    }

    /// Fetch and parse, never failing.
    ///
    /// Provider failures are logged and produce an empty list.
    async fn search(&self, query: &str, limit: usize) -> Vec<CanonicalPaper> {
        let source = self.source();
        match self.try_search(query, limit).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::error!(
                    provider = %source,
                    error = %e,
                    retryable = e.is_retryable(),
                    "provider search failed"
                );
                Vec::new()
            }
        }
    }
}

/// Parse every raw record, skipping the ones that fail.
pub fn parse_records<P>(provider: &P, records: Vec<Value>) -> Vec<CanonicalPaper>
where
    P: PaperProvider + ?Sized,
{
    let source = provider.source();
    let total = records.len();
    let papers: Vec<CanonicalPaper> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match provider.parse(raw) {
            Ok(paper) => Some(paper),
            Err(e) => {
                tracing::error!(provider = %source, index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    tracing::debug!(provider = %source, total, parsed = papers.len(), "parsed provider records");
    papers
}

/// Decode a single record into a provider schema.
pub(crate) fn decode_record<T>(raw: Value) -> ProviderResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(raw).map_err(ProviderError::from)
}

/// Build the fixed provider set in registration order.
#[must_use]
pub fn register_all_providers(config: &Config, client: &HttpClient) -> Vec<Arc<dyn PaperProvider>> {
    vec![
        Arc::new(SemanticScholarProvider::new(client.clone(), config)),
        Arc::new(CrossRefProvider::new(client.clone(), config)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_registration_order() {
        let config = Config::for_testing("http://127.0.0.1:1");
        let providers = register_all_providers(&config, &client());
        let sources: Vec<_> = providers.iter().map(|p| p.source()).collect();
        assert_eq!(sources, PaperSource::ALL.to_vec());
    }

    #[test]
    fn test_parse_records_skips_bad_records() {
        let config = Config::for_testing("http://127.0.0.1:1");
        let provider = SemanticScholarProvider::new(client(), &config);
        let records = vec![
            serde_json::json!({"title": "Good", "citationCount": 3}),
            serde_json::json!({"title": "Bad", "citationCount": "many"}),
            serde_json::json!(null),
            serde_json::json!({"title": "Also good"}),
        ];

        let papers = parse_records(&provider, records);
        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Good", "Also good"]);
    }
}
