//! Semantic Scholar Graph API adapter.

use serde::Deserialize;
use serde_json::Value;

use super::{PaperProvider, decode_record};
use crate::client::HttpClient;
use crate::config::{Config, api, fields};
use crate::error::ProviderResult;
use crate::models::{CanonicalPaper, PaperSource};

/// `GET /paper/search` response envelope.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// A paper record as returned by `/paper/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    #[serde(default)]
    paper_id: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    authors: Option<Vec<S2Author>>,

    #[serde(default)]
    r#abstract: Option<String>,

    #[serde(default)]
    year: Option<i32>,

    #[serde(default)]
    venue: Option<String>,

    #[serde(default)]
    citation_count: Option<i64>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    open_access_pdf: Option<S2OpenAccessPdf>,
}

#[derive(Debug, Default, Deserialize)]
struct S2Author {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct S2OpenAccessPdf {
    #[serde(default)]
    url: Option<String>,
}

impl From<S2Paper> for CanonicalPaper {
    fn from(raw: S2Paper) -> Self {
        let mut paper = Self::new(PaperSource::SemanticScholar, raw.title.unwrap_or_default());
        paper.authors = raw
            .authors
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.name.unwrap_or_default())
            .collect();
        paper.r#abstract = raw.r#abstract;
        paper.year = raw.year;
        paper.venue = raw.venue;
        paper.citation_count = raw.citation_count.unwrap_or(0);
        paper.url = raw.url;
        paper.pdf_url = raw.open_access_pdf.and_then(|pdf| pdf.url);
        paper.paper_id = raw.paper_id;
        paper
    }
}

/// Semantic Scholar search adapter.
#[derive(Clone)]
pub struct SemanticScholarProvider {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarProvider {
    /// Create an adapter using `config`'s endpoint and API key.
    #[must_use]
    pub fn new(client: HttpClient, config: &Config) -> Self {
        Self {
            client,
            base_url: config.semantic_scholar_url.trim_end_matches('/').to_string(),
            api_key: config.semantic_scholar_api_key.clone(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/paper/search", self.base_url)
    }
}

impl std::fmt::Debug for SemanticScholarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarProvider")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl PaperProvider for SemanticScholarProvider {
    fn source(&self) -> PaperSource {
        PaperSource::SemanticScholar
    }

    fn build_params(&self, query: &str, limit: usize) -> Vec<(String, String)> {
        vec![
            ("query".to_string(), query.to_string()),
            ("limit".to_string(), limit.min(api::SEMANTIC_SCHOLAR_MAX_LIMIT).to_string()),
            ("fields".to_string(), fields::SEMANTIC_SCHOLAR.join(",")),
        ]
    }

    async fn fetch(&self, query: &str, limit: usize) -> ProviderResult<Vec<Value>> {
        let params = self.build_params(query, limit);
        let headers: Vec<(&'static str, String)> =
            self.api_key.iter().map(|key| ("x-api-key", key.clone())).collect();

        let body = self.client.get_json(&self.search_url(), &params, &headers).await?;
        let response: SearchResponse = serde_json::from_value(body)?;
        Ok(response.data.unwrap_or_default())
    }

    fn parse(&self, raw: Value) -> ProviderResult<CanonicalPaper> {
        decode_record::<S2Paper>(raw).map(CanonicalPaper::from)
    }
}
