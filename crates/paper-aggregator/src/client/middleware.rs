//! Middleware for the outbound HTTP client.

use std::time::Instant;

use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

/// Logs method, host, path, status and latency of every outbound request.
///
/// Query strings are left out of the log line; they can carry API keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogging;

#[async_trait::async_trait]
impl Middleware for RequestLogging {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let host = req.url().host_str().unwrap_or_default().to_string();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::debug!(
                %method,
                %host,
                %path,
                status = response.status().as_u16(),
                elapsed_ms,
                "outbound request"
            ),
            Err(e) => tracing::debug!(%method, %host, %path, elapsed_ms, error = %e, "outbound request failed"),
        }

        result
    }
}
