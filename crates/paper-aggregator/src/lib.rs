//! Paper Aggregator
//!
//! Searches several academic paper providers concurrently, normalizes their
//! records into one shape, ranks them by citation count and persists each
//! search and its papers to a document store.
//!
//! # Features
//!
//! - **Two providers**: Semantic Scholar and CrossRef, queried in parallel
//! - **Failure containment**: a failing provider or malformed record never fails a search
//! - **Pluggable store**: in-memory or an HTTP document data API
//! - **HTTP API**: axum server with history and saved-paper endpoints
//!
//! # Example
//!
//! ```no_run
//! use paper_aggregator::{Config, SearchRequest, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let service = SearchService::from_config(&config)?;
//!
//!     let request = SearchRequest::new("graph neural networks").with_limit(10);
//!     let envelope = service.search(&request).await?;
//!     println!("{} papers", envelope.total_count);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fanout;
pub mod models;
pub mod providers;
pub mod rank;
pub mod server;
pub mod service;
pub mod store;

pub use client::HttpClient;
pub use config::Config;
pub use error::{ProviderError, SearchError, StoreError};
pub use models::{CanonicalPaper, PaperSource, SearchHistoryEntry, SearchRequest, SearchResultEnvelope};
pub use service::SearchService;
