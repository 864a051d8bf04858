//! Document store abstraction and implementations.
//!
//! The store is an opaque collection-of-JSON-documents service with four
//! operations: insert, replace-by-filter (optionally upserting), sorted and
//! limited find, and delete-many. [`PersistenceGateway`] maps the aggregator's
//! records onto it.

mod data_api;
mod gateway;
mod memory;

pub use data_api::DataApiStore;
pub use gateway::{PersistenceGateway, collections};
pub use memory::MemoryStore;

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::client::HttpClient;
use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreResult;

/// A stored JSON document.
pub type Document = Map<String, Value>;

/// Sort order for [`DocumentStore::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Top-level field to sort on.
    pub field: String,
    /// Newest/largest first when true.
    pub descending: bool,
}

impl SortSpec {
    /// Descending sort on `field`.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }
}

/// What a replace did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    /// Documents that matched the filter.
    pub matched: u64,
    /// Whether a new document was inserted.
    pub upserted: bool,
}

/// CRUD operations the aggregator needs from a document store.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Replace the first document matching `filter`; insert when nothing
    /// matches and `upsert` is set.
    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
        upsert: bool,
    ) -> StoreResult<ReplaceOutcome>;

    /// Documents matching `filter`, sorted, at most `limit` of them.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<SortSpec>,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Delete every document matching `filter`, returning how many went.
    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64>;
}

/// Open the store selected by `config`.
///
/// # Errors
///
/// Returns error if the data API backend is selected without a URL or its
/// HTTP client cannot be built.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::DataApi => {
            let client = HttpClient::new(config.request_timeout, config.request_timeout)?;
            Ok(Arc::new(DataApiStore::new(client, config)?))
        }
    }
}

/// Whether every field of `filter` equals the same field of `document`.
#[must_use]
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| document.get(key) == Some(expected))
}

/// Order two field values: numbers numerically, RFC 3339 timestamps
/// chronologically, strings lexically. Missing values sort first.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_matches_filter() {
        let document = doc(json!({"title": "A", "source": "CrossRef", "year": 2020}));
        assert!(matches_filter(&document, &doc(json!({"title": "A", "source": "CrossRef"}))));
        assert!(!matches_filter(&document, &doc(json!({"title": "A", "source": "Semantic Scholar"}))));
        assert!(matches_filter(&document, &Document::new()));
    }

    #[test]
    fn test_compare_timestamps_with_mixed_precision() {
        let earlier = json!("2024-01-01T00:00:00Z");
        let later = json!("2024-01-01T00:00:00.500Z");
        assert_eq!(compare_values(Some(&earlier), Some(&later)), Ordering::Less);
    }

    #[test]
    fn test_compare_numbers_and_missing() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(None, Some(&json!(1))), Ordering::Less);
        assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
    }
}
