//! Search history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded search. Entries are never mutated, only bulk-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// Generated id.
    pub id: Uuid,

    /// Query text as the caller sent it (without folded hints).
    pub query: String,

    /// When the search completed.
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Number of papers returned.
    pub result_count: usize,
}

impl SearchHistoryEntry {
    /// Create an entry stamped now.
    #[must_use]
    pub fn new(query: impl Into<String>, result_count: usize) -> Self {
        Self { id: Uuid::new_v4(), query: query.into(), timestamp: Utc::now(), result_count }
    }
}
