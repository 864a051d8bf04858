//! CrossRef works API adapter.

use serde::Deserialize;
use serde_json::Value;

use super::{PaperProvider, decode_record};
use crate::client::HttpClient;
use crate::config::{Config, fields};
use crate::error::ProviderResult;
use crate::models::{CanonicalPaper, PaperSource};

/// `GET /works` response envelope.
#[derive(Debug, Default, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    message: Option<WorksMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct WorksMessage {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

/// A work record as returned by `/works`.
#[derive(Debug, Default, Deserialize)]
struct CrossRefWork {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,

    /// CrossRef returns titles as a list; the first entry is the title.
    #[serde(default)]
    title: Option<Vec<String>>,

    #[serde(default)]
    author: Option<Vec<CrossRefAuthor>>,

    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,

    #[serde(rename = "published-print", default)]
    published_print: Option<CrossRefDate>,

    #[serde(rename = "container-title", default)]
    container_title: Option<Vec<String>>,

    #[serde(rename = "URL", default)]
    url: Option<String>,

    #[serde(rename = "is-referenced-by-count", default)]
    citation_count: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct CrossRefAuthor {
    #[serde(default)]
    given: Option<String>,

    #[serde(default)]
    family: Option<String>,
}

impl CrossRefAuthor {
    fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.given.as_deref().unwrap_or_default(),
            self.family.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// `{"date-parts": [[2019, 6, 1]]}`; parts may be null.
#[derive(Debug, Default, Deserialize)]
struct CrossRefDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Option<Vec<Vec<Option<i32>>>>,
}

impl CrossRefDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.as_ref()?.first()?.first().copied().flatten()
    }
}

impl From<CrossRefWork> for CanonicalPaper {
    fn from(raw: CrossRefWork) -> Self {
        let title = raw.title.and_then(|t| t.into_iter().next()).unwrap_or_default();
        let mut paper = Self::new(PaperSource::CrossRef, title);
        paper.authors =
            raw.author.unwrap_or_default().iter().map(CrossRefAuthor::display_name).collect();
        paper.r#abstract = raw.abstract_text;
        paper.year = raw.published_print.as_ref().and_then(CrossRefDate::year);
        paper.venue = raw.container_title.and_then(|v| v.into_iter().next());
        paper.citation_count = raw.citation_count.unwrap_or(0);
        paper.url = raw.url;
        paper.doi = raw.doi;
        paper
    }
}

/// CrossRef search adapter.
#[derive(Debug, Clone)]
pub struct CrossRefProvider {
    client: HttpClient,
    base_url: String,
    mailto: Option<String>,
}

impl CrossRefProvider {
    /// Create an adapter using `config`'s endpoint and polite-pool address.
    #[must_use]
    pub fn new(client: HttpClient, config: &Config) -> Self {
        Self {
            client,
            base_url: config.crossref_url.trim_end_matches('/').to_string(),
            mailto: config.crossref_mailto.clone(),
        }
    }

    fn works_url(&self) -> String {
        format!("{}/works", self.base_url)
    }
}

#[async_trait::async_trait]
impl PaperProvider for CrossRefProvider {
    fn source(&self) -> PaperSource {
        PaperSource::CrossRef
    }

    fn build_params(&self, query: &str, limit: usize) -> Vec<(String, String)> {
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("rows".to_string(), limit.to_string()),
            ("select".to_string(), fields::CROSSREF.join(",")),
        ];
        if let Some(ref mailto) = self.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }
        params
    }

    async fn fetch(&self, query: &str, limit: usize) -> ProviderResult<Vec<Value>> {
        let params = self.build_params(query, limit);
        let body = self.client.get_json(&self.works_url(), &params, &[]).await?;
        let response: WorksResponse = serde_json::from_value(body)?;
        Ok(response.message.and_then(|m| m.items).unwrap_or_default())
    }

    fn parse(&self, raw: Value) -> ProviderResult<CanonicalPaper> {
        decode_record::<CrossRefWork>(raw).map(CanonicalPaper::from)
    }
}
