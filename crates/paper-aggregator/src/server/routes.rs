//! Route table and handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::SearchResult;
use crate::models::{CanonicalPaper, SearchHistoryEntry, SearchRequest, SearchResultEnvelope};
use crate::service::SearchService;

/// API name reported at the root endpoint.
pub const API_NAME: &str = "Academic Search Engine API";

/// API version reported at the root endpoint.
pub const API_VERSION: &str = "1.0.0";

/// Shared state for HTTP handlers.
type AppState = Arc<SearchService>;

/// Create the HTTP router.
pub fn create_router(service: SearchService) -> Router {
    let state: AppState = Arc::new(service);

    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/search", post(search))
        .route("/api/search/history", get(search_history).delete(clear_search_history))
        .route("/api/papers/saved", get(saved_papers))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "paper-aggregator",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": API_NAME,
        "version": API_VERSION
    }))
}

async fn search(
    State(service): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> SearchResult<Json<SearchResultEnvelope>> {
    tracing::debug!(query = %request.query, "Handling search request");
    service.search(&request).await.map(Json)
}

async fn search_history(State(service): State<AppState>) -> SearchResult<Json<Vec<SearchHistoryEntry>>> {
    service.history().await.map(Json)
}

async fn clear_search_history(State(service): State<AppState>) -> SearchResult<Json<serde_json::Value>> {
    let deleted = service.clear_history().await?;
    Ok(Json(serde_json::json!({
        "message": format!("Deleted {deleted} search history records")
    })))
}

async fn saved_papers(State(service): State<AppState>) -> SearchResult<Json<Vec<CanonicalPaper>>> {
    service.saved_papers().await.map(Json)
}
