//! Configuration for the paper aggregator.

use std::time::Duration;

/// Provider endpoint and timing constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// CrossRef REST API endpoint.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// Fixed per-call timeout for provider requests.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Upper bound the coordinator places on each provider task.
    pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

    /// Largest page Semantic Scholar accepts for `/paper/search`.
    pub const SEMANTIC_SCHOLAR_MAX_LIMIT: usize = 100;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Result-size defaults for the search facade.
pub mod limits {
    /// Results returned when a request omits `limit`.
    pub const DEFAULT_LIMIT: i64 = 20;

    /// Maximum history entries returned by a history read.
    pub const HISTORY_LIMIT: usize = 50;

    /// Maximum stored papers returned by a saved-papers read.
    pub const SAVED_PAPERS_LIMIT: usize = 100;
}

/// Field selections sent to each provider.
pub mod fields {
    /// Semantic Scholar paper fields.
    pub const SEMANTIC_SCHOLAR: &[&str] = &[
        "paperId",
        "title",
        "authors",
        "abstract",
        "year",
        "venue",
        "citationCount",
        "url",
        "openAccessPdf",
    ];

    /// CrossRef work fields.
    pub const CROSSREF: &[&str] = &[
        "DOI",
        "title",
        "author",
        "abstract",
        "published-print",
        "container-title",
        "URL",
        "type",
        "is-referenced-by-count",
    ];
}

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreBackend {
    /// Process-local store, lost on exit.
    #[default]
    Memory,
    /// Remote document store spoken to over its HTTP data API.
    DataApi,
}

/// Document store configuration.
#[derive(Clone)]
pub struct StoreConfig {
    /// Selected backend.
    pub backend: StoreBackend,

    /// Base URL of the HTTP data API (required for [`StoreBackend::DataApi`]).
    pub url: Option<String>,

    /// API key sent as the `api-key` header.
    pub api_key: Option<String>,

    /// Database name.
    pub database: String,

    /// Data source (cluster) name.
    pub data_source: String,

    /// Request timeout for store calls.
    pub request_timeout: Duration,
}

impl StoreConfig {
    /// In-memory store configuration.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            api_key: None,
            database: "paper_aggregator".to_string(),
            data_source: "default".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// HTTP data API configuration pointing at `url`.
    #[must_use]
    pub fn data_api(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::DataApi,
            url: Some(url.into()),
            database: database.into(),
            ..Self::memory()
        }
    }

    /// Read store settings from `STORE_BACKEND`, `STORE_URL`, `STORE_API_KEY`,
    /// `DB_NAME` and `STORE_DATA_SOURCE`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::memory();

        if let Ok(backend) = std::env::var("STORE_BACKEND") {
            config.backend = <StoreBackend as clap::ValueEnum>::from_str(&backend, true)
                .map_err(|e| anyhow::anyhow!("invalid STORE_BACKEND: {e}"))?;
        }
        config.url = std::env::var("STORE_URL").ok();
        config.api_key = std::env::var("STORE_API_KEY").ok();
        if let Ok(database) = std::env::var("DB_NAME") {
            config.database = database;
        }
        if let Ok(data_source) = std::env::var("STORE_DATA_SOURCE") {
            config.data_source = data_source;
        }

        if config.backend == StoreBackend::DataApi && config.url.is_none() {
            anyhow::bail!("STORE_URL is required for the data-api store backend");
        }
        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("database", &self.database)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

/// Aggregator configuration.
#[derive(Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub semantic_scholar_api_key: Option<String>,

    /// Contact address for the CrossRef polite pool (optional).
    pub crossref_mailto: Option<String>,

    /// Base URL for the Semantic Scholar Graph API (for testing with mock servers).
    pub semantic_scholar_url: String,

    /// Base URL for the CrossRef API (for testing with mock servers).
    pub crossref_url: String,

    /// Per-request timeout on the HTTP client.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Coordinator-level bound on each provider task.
    pub provider_timeout: Duration,

    /// Document store settings.
    pub store: StoreConfig,
}

impl Config {
    /// Create a configuration against the public provider endpoints.
    #[must_use]
    pub fn new(semantic_scholar_api_key: Option<String>, crossref_mailto: Option<String>) -> Self {
        Self {
            semantic_scholar_api_key,
            crossref_mailto,
            semantic_scholar_url: api::SEMANTIC_SCHOLAR_API.to_string(),
            crossref_url: api::CROSSREF_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            provider_timeout: api::PROVIDER_TIMEOUT,
            store: StoreConfig::memory(),
        }
    }

    /// Create a test configuration with both providers served by one mock server.
    ///
    /// Semantic Scholar lives under `/graph/v1`, CrossRef at the root.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            semantic_scholar_api_key: None,
            crossref_mailto: None,
            semantic_scholar_url: format!("{}/graph/v1", base_url),
            crossref_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            provider_timeout: Duration::from_secs(5),
            store: StoreConfig::memory(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the store settings are inconsistent.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
        let mailto = std::env::var("CROSSREF_MAILTO").ok();
        let mut config = Self::new(api_key, mailto);
        config.store = StoreConfig::from_env()?;
        Ok(config)
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.semantic_scholar_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("semantic_scholar_url", &self.semantic_scholar_url)
            .field("crossref_url", &self.crossref_url)
            .field("has_api_key", &self.has_api_key())
            .field("crossref_mailto", &self.crossref_mailto)
            .field("provider_timeout", &self.provider_timeout)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.has_api_key());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_for_testing_routes_both_providers_to_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.semantic_scholar_url, "http://127.0.0.1:9999/graph/v1");
        assert_eq!(config.crossref_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = Config::new(Some("s2-secret".to_string()), None);
        config.store.api_key = Some("store-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("s2-secret"));
        assert!(!debug.contains("store-secret"));
        assert!(debug.contains("has_api_key"));
    }

    #[test]
    fn test_fields() {
        assert!(fields::SEMANTIC_SCHOLAR.contains(&"openAccessPdf"));
        assert!(fields::CROSSREF.contains(&"is-referenced-by-count"));
    }
}
