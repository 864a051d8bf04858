//! HTTP API server.
//!
//! Serves the search facade as JSON over axum with permissive CORS and
//! request tracing. Shuts down gracefully on Ctrl-C.

pub mod routes;

use std::net::SocketAddr;

pub use routes::create_router;

use crate::service::SearchService;

/// HTTP front end for a [`SearchService`].
#[derive(Debug, Clone)]
pub struct ApiServer {
    service: SearchService,
}

impl ApiServer {
    /// Create a server around `service`.
    #[must_use]
    pub const fn new(service: SearchService) -> Self {
        Self { service }
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound or the server fails.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let router = create_router(self.service);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}
