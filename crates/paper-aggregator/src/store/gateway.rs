//! Persistence gateway: maps search records onto the document store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Document, DocumentStore, SortSpec};
use crate::config::limits;
use crate::error::{StoreError, StoreResult};
use crate::models::{CanonicalPaper, SearchHistoryEntry};

/// Collection names.
pub mod collections {
    /// Persisted papers, keyed by `(title, source)`.
    pub const PAPERS: &str = "papers";

    /// One entry per executed search.
    pub const SEARCH_HISTORY: &str = "search_history";
}

/// Reads and writes search history and saved papers.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
}

impl PersistenceGateway {
    /// Wrap a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record one executed search: append a history entry, then upsert every
    /// paper by `(title, source)` with a fresh `created_at`.
    ///
    /// Returns the papers as stored. Stops at the first store failure.
    ///
    /// # Errors
    ///
    /// Returns error if any store write fails.
    pub async fn record_search(
        &self,
        query: &str,
        papers: Vec<CanonicalPaper>,
    ) -> StoreResult<Vec<CanonicalPaper>> {
        let entry = SearchHistoryEntry::new(query, papers.len());
        self.store.insert_one(collections::SEARCH_HISTORY, to_document(&entry)?).await?;

        let mut stored = Vec::with_capacity(papers.len());
        for mut paper in papers {
            paper.created_at = Some(Utc::now());
            self.upsert_paper(&paper).await?;
            stored.push(paper);
        }

        tracing::debug!(query, papers = stored.len(), "search recorded");
        Ok(stored)
    }

    /// Insert or replace the stored paper with the same `(title, source)`.
    ///
    /// # Errors
    ///
    /// Returns error if the store write fails.
    pub async fn upsert_paper(&self, paper: &CanonicalPaper) -> StoreResult<()> {
        let (title, source) = paper.natural_key();
        let mut filter = Document::new();
        filter.insert("title".to_string(), Value::from(title));
        filter.insert("source".to_string(), Value::from(source.as_str()));

        self.store
            .replace_one(collections::PAPERS, filter, to_document(paper)?, true)
            .await?;
        Ok(())
    }

    /// Most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the store read fails or a document is malformed.
    pub async fn history(&self) -> StoreResult<Vec<SearchHistoryEntry>> {
        let documents = self
            .store
            .find(
                collections::SEARCH_HISTORY,
                Document::new(),
                Some(SortSpec::descending("timestamp")),
                limits::HISTORY_LIMIT,
            )
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    /// Stored papers, most recently written first.
    ///
    /// # Errors
    ///
    /// Returns error if the store read fails or a document is malformed.
    pub async fn saved_papers(&self) -> StoreResult<Vec<CanonicalPaper>> {
        let documents = self
            .store
            .find(
                collections::PAPERS,
                Document::new(),
                Some(SortSpec::descending("created_at")),
                limits::SAVED_PAPERS_LIMIT,
            )
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    /// Remove every history entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the store delete fails.
    pub async fn clear_history(&self) -> StoreResult<u64> {
        let deleted = self.store.delete_many(collections::SEARCH_HISTORY, Document::new()).await?;
        tracing::info!(deleted, "search history cleared");
        Ok(deleted)
    }
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway").finish_non_exhaustive()
    }
}

fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::unavailable(format!("expected a JSON object, got {other}"))),
    }
}

fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
