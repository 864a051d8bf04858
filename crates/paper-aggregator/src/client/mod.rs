//! Shared outbound HTTP client.
//!
//! Provides:
//! - Connection pooling via reqwest
//! - A fixed per-request timeout (no retries: one attempt per provider per search)
//! - Request logging middleware

mod middleware;

pub use middleware::RequestLogging;

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::config::api;
use crate::error::{ProviderError, ProviderResult};

/// HTTP client shared by the providers and the remote document store.
#[derive(Clone)]
pub struct HttpClient {
    /// Client with middleware.
    client: ClientWithMiddleware,

    /// Per-request timeout, reported in timeout errors.
    request_timeout: Duration,
}

impl HttpClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("paper-aggregator/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let client = ClientBuilder::new(client).with(RequestLogging).build();

        Ok(Self { client, request_timeout })
    }

    /// Underlying middleware client.
    #[must_use]
    pub const fn inner(&self) -> &ClientWithMiddleware {
        &self.client
    }

    /// Configured per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// Non-success statuses become [`ProviderError::Status`] carrying the body text.
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
        headers: &[(&'static str, String)],
    ) -> ProviderResult<serde_json::Value> {
        let mut request = self.client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::status(status.as_u16(), text));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.request_timeout)
            } else {
                ProviderError::Http(e)
            }
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn map_send_error(&self, err: reqwest_middleware::Error) -> ProviderError {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                ProviderError::Timeout(self.request_timeout)
            }
            other => ProviderError::from(other),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("request_timeout", &self.request_timeout).finish()
    }
}
