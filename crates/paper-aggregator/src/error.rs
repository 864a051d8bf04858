//! Error types for the paper aggregator.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Provider errors never reach callers of a search: they are contained by the
//! adapters and the fan-out coordinator. Store errors escalate to [`SearchError`].

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from a single provider call.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Provider call exceeded its time budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Response envelope or record could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProviderError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status { status, message: message.into() }
    }

    /// Returns true if a later attempt could plausibly succeed.
    ///
    /// Searches never retry; this only feeds the log line.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Status { status: 429 | 500..=599, .. }
        )
    }
}

/// Errors from the document store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// HTTP transport error talking to a remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Remote store rejected the request
    #[error("Store returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Document (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store cannot be reached or is not configured
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// The single failure signal surfaced by the search facade.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// A search could not be completed.
    #[error("Search failed: {0}")]
    Failed(String),

    /// Search history could not be read.
    #[error("Failed to fetch search history")]
    History(#[source] StoreError),

    /// Search history could not be cleared.
    #[error("Failed to clear search history")]
    ClearHistory(#[source] StoreError),

    /// Saved papers could not be read.
    #[error("Failed to fetch saved papers")]
    SavedPapers(#[source] StoreError),
}

impl SearchError {
    /// Create a search failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        Self::failed(err.to_string())
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for facade operations.
pub type SearchResult<T> = Result<T, SearchError>;
