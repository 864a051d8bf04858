//! Search facade: the one entry point callers use.
//!
//! A search runs in four steps:
//! 1. fold the author and venue hints into one query string
//! 2. fan out to every provider with half the limit each
//! 3. merge, filter by year, rank by citations, truncate
//! 4. record the search and upsert the returned papers
//!
//! Provider trouble never fails a search. A store failure does, and it is
//! not retried.

use std::sync::Arc;

use crate::client::HttpClient;
use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::fanout::FanOutCoordinator;
use crate::models::{CanonicalPaper, SearchHistoryEntry, SearchRequest, SearchResultEnvelope};
use crate::providers::{PaperProvider, register_all_providers};
use crate::rank::{RankOptions, merge_and_rank};
use crate::store::{DocumentStore, PersistenceGateway, open_store};

/// Search facade over the provider fan-out and the persistence gateway.
#[derive(Clone, Debug)]
pub struct SearchService {
    fan_out: FanOutCoordinator,
    gateway: PersistenceGateway,
}

impl SearchService {
    /// Assemble a service from already-built parts.
    #[must_use]
    pub fn new(fan_out: FanOutCoordinator, gateway: PersistenceGateway) -> Self {
        Self { fan_out, gateway }
    }

    /// Build providers and store from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built or the store settings
    /// are unusable.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = open_store(&config.store)?;
        Self::with_store(config, store)
    }

    /// Build providers from `config` and use the given store.
    ///
    /// # Errors
    ///
    /// Returns error if the provider HTTP client cannot be built.
    pub fn with_store(config: &Config, store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let client = HttpClient::new(config.request_timeout, config.connect_timeout)?;
        let providers = register_all_providers(config, &client);
        Ok(Self::with_providers(providers, config, store))
    }

    /// Use explicit providers and store.
    #[must_use]
    pub fn with_providers(
        providers: Vec<Arc<dyn PaperProvider>>,
        config: &Config,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self::new(
            FanOutCoordinator::new(providers, config.provider_timeout),
            PersistenceGateway::new(store),
        )
    }

    /// Run one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Failed`] if persisting the search fails.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResultEnvelope> {
        let combined = request.combined_query();
        let per_provider = request.per_provider_limit();

        tracing::info!(
            query = %request.query,
            combined = %combined,
            limit = request.limit,
            per_provider,
            "search started"
        );

        let lists = if per_provider == 0 {
            tracing::debug!(limit = request.limit, "limit leaves no budget per provider, skipping fan-out");
            Vec::new()
        } else {
            self.fan_out.fan_out(&combined, per_provider).await.into_lists()
        };

        let ranked = merge_and_rank(lists, RankOptions::from(request));

        let stored = self.gateway.record_search(&request.query, ranked).await.map_err(|e| {
            tracing::error!(error = %e, "failed to persist search");
            SearchError::from(e)
        })?;

        let envelope = SearchResultEnvelope::new(stored, request);
        tracing::info!(query = %request.query, total = envelope.total_count, "search finished");
        Ok(envelope)
    }

    /// Most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::History`] if the store read fails.
    pub async fn history(&self) -> SearchResult<Vec<SearchHistoryEntry>> {
        self.gateway.history().await.map_err(|e| {
            tracing::error!(error = %e, "failed to fetch search history");
            SearchError::History(e)
        })
    }

    /// Stored papers, most recently written first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SavedPapers`] if the store read fails.
    pub async fn saved_papers(&self) -> SearchResult<Vec<CanonicalPaper>> {
        self.gateway.saved_papers().await.map_err(|e| {
            tracing::error!(error = %e, "failed to fetch saved papers");
            SearchError::SavedPapers(e)
        })
    }

    /// Remove every history entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ClearHistory`] if the store delete fails.
    pub async fn clear_history(&self) -> SearchResult<u64> {
        self.gateway.clear_history().await.map_err(|e| {
            tracing::error!(error = %e, "failed to clear search history");
            SearchError::ClearHistory(e)
        })
    }
}
