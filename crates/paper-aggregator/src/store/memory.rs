//! Process-local document store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Document, DocumentStore, ReplaceOutcome, SortSpec, compare_values, matches_filter};
use crate::error::StoreResult;

/// In-memory store keyed by collection name.
///
/// Documents keep insertion order, which breaks ties when sorting.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map_or(0, Vec::len)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
        upsert: bool,
    ) -> StoreResult<ReplaceOutcome> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = documents.iter_mut().find(|d| matches_filter(d, &filter)) {
            *existing = replacement;
            return Ok(ReplaceOutcome { matched: 1, upserted: false });
        }

        if upsert {
            documents.push(replacement);
            return Ok(ReplaceOutcome { matched: 0, upserted: true });
        }

        Ok(ReplaceOutcome::default())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<SortSpec>,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches_filter(d, &filter)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = sort {
            // stable: equal keys stay in insertion order
            found.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending { ordering.reverse() } else { ordering }
            });
        }

        found.truncate(limit);
        Ok(found)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|d| !matches_filter(d, &filter));
        Ok((before - documents.len()) as u64)
    }
}
