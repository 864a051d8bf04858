//! Remote document store reached over an HTTP data API.
//!
//! Every operation is a JSON `POST` to `{base}/action/{name}`:
//!
//! | action       | extra request fields                 | response            |
//! |--------------|--------------------------------------|---------------------|
//! | `insertOne`  | `document`                           | `insertedId`        |
//! | `replaceOne` | `filter`, `replacement`, `upsert`    | `matchedCount`, ... |
//! | `find`       | `filter`, `sort`, `limit`            | `documents`         |
//! | `deleteMany` | `filter`                             | `deletedCount`      |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Document, DocumentStore, ReplaceOutcome, SortSpec};
use crate::client::HttpClient;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Request body shared by every action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest<'a> {
    data_source: &'a str,
    database: &'a str,
    collection: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<Document>,

    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Document>,

    #[serde(skip_serializing_if = "Option::is_none")]
    replacement: Option<Document>,

    #[serde(skip_serializing_if = "Option::is_none")]
    upsert: Option<bool>,

    /// `{"field": -1}` for descending, `1` for ascending.
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl<'a> ActionRequest<'a> {
    fn new(store: &'a DataApiStore, collection: &'a str) -> Self {
        Self {
            data_source: &store.data_source,
            database: &store.database,
            collection,
            document: None,
            filter: None,
            replacement: None,
            upsert: None,
            sort: None,
            limit: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertOneResponse {
    #[serde(default)]
    inserted_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceOneResponse {
    #[serde(default)]
    matched_count: u64,

    #[serde(default)]
    upserted_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteManyResponse {
    #[serde(default)]
    deleted_count: u64,
}

/// Document store client for an HTTP data API.
#[derive(Clone)]
pub struct DataApiStore {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    database: String,
    data_source: String,
}

impl DataApiStore {
    /// Create a store client from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if `config` has no URL or the URL does not parse.
    pub fn new(client: HttpClient, config: &StoreConfig) -> anyhow::Result<Self> {
        let raw = config.url.as_deref().ok_or_else(|| anyhow::anyhow!("data-api store requires a URL"))?;
        let parsed = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid store URL {raw:?}: {e}"))?;
        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            database: config.database.clone(),
            data_source: config.data_source.clone(),
        })
    }

    async fn action<T: DeserializeOwned>(&self, action: &str, body: &ActionRequest<'_>) -> StoreResult<T> {
        let url = format!("{}/action/{action}", self.base_url);
        let mut request = self.client.inner().post(&url).json(body);
        if let Some(ref key) = self.api_key {
            request = request.header("api-key", key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(action, collection = body.collection, status = status.as_u16(), "store request rejected");
            return Err(StoreError::Status { status: status.as_u16(), message });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for DataApiStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataApiStore")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl DocumentStore for DataApiStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let mut body = ActionRequest::new(self, collection);
        body.document = Some(document);
        let response: InsertOneResponse = self.action("insertOne", &body).await?;
        tracing::trace!(collection, inserted_id = ?response.inserted_id, "document inserted");
        Ok(())
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
        upsert: bool,
    ) -> StoreResult<ReplaceOutcome> {
        let mut body = ActionRequest::new(self, collection);
        body.filter = Some(filter);
        body.replacement = Some(replacement);
        body.upsert = Some(upsert);

        let response: ReplaceOneResponse = self.action("replaceOne", &body).await?;
        Ok(ReplaceOutcome {
            matched: response.matched_count,
            upserted: response.upserted_id.is_some_and(|id| !id.is_null()),
        })
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<SortSpec>,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let mut body = ActionRequest::new(self, collection);
        body.filter = Some(filter);
        body.sort = sort.map(|s| {
            let mut spec = Map::new();
            spec.insert(s.field, Value::from(if s.descending { -1 } else { 1 }));
            spec
        });
        body.limit = Some(limit);

        let response: FindResponse = self.action("find", &body).await?;
        Ok(response.documents)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let mut body = ActionRequest::new(self, collection);
        body.filter = Some(filter);

        let response: DeleteManyResponse = self.action("deleteMany", &body).await?;
        Ok(response.deleted_count)
    }
}
