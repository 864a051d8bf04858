//! Search request accepted by the facade.

use serde::{Deserialize, Serialize};

use crate::config::limits::DEFAULT_LIMIT;

/// A canonical search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query (may be empty).
    pub query: String,

    /// Author hint, folded into the query as `author:<name>`.
    #[serde(default)]
    pub author: Option<String>,

    /// Venue hint, folded into the query as `venue:<name>`.
    #[serde(default)]
    pub venue: Option<String>,

    /// Minimum publication year (inclusive).
    #[serde(default)]
    pub year_from: Option<i32>,

    /// Maximum publication year (inclusive).
    #[serde(default)]
    pub year_to: Option<i32>,

    /// Requested result count; negative values yield no results.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl SearchRequest {
    /// Request for `query` with default filters and limit.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            author: None,
            venue: None,
            year_from: None,
            year_to: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the author hint.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the venue hint.
    #[must_use]
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    /// Set the inclusive year bounds.
    #[must_use]
    pub const fn with_years(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    /// Set the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Limit clamped to zero.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        usize::try_from(self.limit.max(0)).unwrap_or(usize::MAX)
    }

    /// Records requested from each of the two providers.
    ///
    /// Integer division: an odd limit asks for one fewer record in total.
    #[must_use]
    pub fn per_provider_limit(&self) -> usize {
        self.effective_limit() / 2
    }

    /// Query text with the structured hints folded in.
    #[must_use]
    pub fn combined_query(&self) -> String {
        let mut parts = vec![self.query.clone()];
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            parts.push(format!("author:{author}"));
        }
        if let Some(venue) = self.venue.as_deref().filter(|v| !v.is_empty()) {
            parts.push(format!("venue:{venue}"));
        }
        parts.join(" ")
    }

    /// Year range echo, `"any"` standing in for a missing bound.
    #[must_use]
    pub fn year_range(&self) -> String {
        let bound = |year: Option<i32>| year.map_or_else(|| "any".to_string(), |y| y.to_string());
        format!("{}-{}", bound(self.year_from), bound(self.year_to))
    }
}
