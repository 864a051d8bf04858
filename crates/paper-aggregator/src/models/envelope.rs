//! Response envelope returned by a search.

use serde::{Deserialize, Serialize};

use super::{CanonicalPaper, SearchRequest};

/// Echo of the effective query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInfo {
    /// Original free-text query.
    pub query: String,

    /// Author hint.
    pub author: Option<String>,

    /// Venue hint.
    pub venue: Option<String>,

    /// `"{from}-{to}"`, with `"any"` for a missing bound.
    pub year_range: String,
}

impl From<&SearchRequest> for QueryInfo {
    fn from(request: &SearchRequest) -> Self {
        Self {
            query: request.query.clone(),
            author: request.author.clone(),
            venue: request.venue.clone(),
            year_range: request.year_range(),
        }
    }
}

/// Ranked, truncated search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultEnvelope {
    /// Papers in rank order.
    pub papers: Vec<CanonicalPaper>,

    /// Always `papers.len()`.
    pub total_count: usize,

    /// Effective query parameters.
    pub query_info: QueryInfo,
}

impl SearchResultEnvelope {
    /// Build an envelope; `total_count` is derived from `papers`.
    #[must_use]
    pub fn new(papers: Vec<CanonicalPaper>, request: &SearchRequest) -> Self {
        Self { total_count: papers.len(), papers, query_info: QueryInfo::from(request) }
    }

    /// Whether no papers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperSource;

    #[test]
    fn test_envelope_shape() {
        let request = SearchRequest::new("graphs").with_author("Erdos").with_years(Some(1950), None);
        let papers = vec![CanonicalPaper::new(PaperSource::CrossRef, "Random graphs")];
        let envelope = SearchResultEnvelope::new(papers, &request);

        assert_eq!(envelope.total_count, 1);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["query_info"]["year_range"], "1950-any");
        assert_eq!(json["query_info"]["author"], "Erdos");
        assert!(json["query_info"]["venue"].is_null());
        assert_eq!(json["papers"][0]["source"], "CrossRef");
    }
}
