//! Canonical paper record shared by every provider.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which provider a record came from.
///
/// Registration order of the fan-out follows [`PaperSource::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaperSource {
    /// Semantic Scholar Graph API.
    #[serde(rename = "Semantic Scholar")]
    SemanticScholar,

    /// CrossRef REST API.
    #[serde(rename = "CrossRef")]
    CrossRef,
}

impl PaperSource {
    /// Every provider, in registration order.
    pub const ALL: [Self; 2] = [Self::SemanticScholar, Self::CrossRef];

    /// Stored/serialized tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SemanticScholar => "Semantic Scholar",
            Self::CrossRef => "CrossRef",
        }
    }
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paper normalized from any provider.
///
/// Persistence identity is `(title, source)`; the same work returned by both
/// providers is stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPaper {
    /// Stored document id.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Paper title, empty when the provider omits it.
    #[serde(default)]
    pub title: String,

    /// Author display names in byline order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Abstract text.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Journal or conference name.
    #[serde(default)]
    pub venue: Option<String>,

    /// Citation count, 0 when unknown.
    #[serde(default)]
    pub citation_count: i64,

    /// Landing page URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Open access PDF URL.
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,

    /// Provider the record came from.
    pub source: PaperSource,

    /// Provider-native identifier.
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Set when the record is persisted.
    #[serde(default, with = "super::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CanonicalPaper {
    /// Create an empty record for `source` with a fresh id.
    #[must_use]
    pub fn new(source: PaperSource, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            authors: Vec::new(),
            r#abstract: None,
            year: None,
            venue: None,
            citation_count: 0,
            url: None,
            pdf_url: None,
            doi: None,
            source,
            paper_id: None,
            created_at: None,
        }
    }

    /// Natural key used for upserts.
    #[must_use]
    pub fn natural_key(&self) -> (&str, PaperSource) {
        (&self.title, self.source)
    }

    /// Whether the year is known and outside `[from, to]`.
    #[must_use]
    pub fn outside_years(&self, from: Option<i32>, to: Option<i32>) -> bool {
        let Some(year) = self.year else {
            return false;
        };
        from.is_some_and(|from| year < from) || to.is_some_and(|to| year > to)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}
