//! HTTP API tests driving the axum router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_aggregator::client::HttpClient;
use paper_aggregator::config::{Config, StoreConfig};
use paper_aggregator::server::create_router;
use paper_aggregator::service::SearchService;
use paper_aggregator::store::{DataApiStore, MemoryStore};

async fn mock_providers() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"paperId": "a", "title": "Alpha", "year": 2019, "citationCount": 12}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": {"items": [
            {"title": ["Beta"], "is-referenced-by-count": 30}
        ]}})))
        .mount(&server)
        .await;
    server
}

fn router(server: &MockServer) -> Router {
    let config = Config::for_testing(&server.uri());
    let service = SearchService::with_store(&config, Arc::new(MemoryStore::new())).unwrap();
    create_router(service)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = mock_providers().await;
    let router = router(&server);

    let (status, body) = send(&router, get("/api/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Academic Search Engine API", "version": "1.0.0"}));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = mock_providers().await;
    let (status, body) = send(&router(&server), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_search_then_history_and_saved() {
    let server = mock_providers().await;
    let router = router(&server);

    let (status, body) =
        send(&router, post_json("/api/search", &json!({"query": "ranking", "limit": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["papers"][0]["title"], "Beta");
    assert_eq!(body["papers"][0]["source"], "CrossRef");
    assert_eq!(body["papers"][1]["source"], "Semantic Scholar");
    assert_eq!(body["query_info"]["year_range"], "any-any");

    let (status, history) = send(&router, get("/api/search/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["query"], "ranking");
    assert_eq!(history[0]["result_count"], 2);

    let (status, saved) = send(&router, get("/api/papers/saved")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_search_uses_default_limit() {
    let server = mock_providers().await;
    let (status, body) = send(&router(&server), post_json("/api/search", &json!({"query": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
}

#[tokio::test]
async fn test_clear_history_message() {
    let server = mock_providers().await;
    let router = router(&server);

    for query in ["a", "b", "c"] {
        send(&router, post_json("/api/search", &json!({"query": query, "limit": 2}))).await;
    }

    let request = Request::builder().method("DELETE").uri("/api/search/history").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted 3 search history records");
}

#[tokio::test]
async fn test_store_failure_maps_to_500_detail() {
    let providers = mock_providers().await;

    let store_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("cluster down"))
        .mount(&store_server)
        .await;

    let config = Config::for_testing(&providers.uri());
    let store_client = HttpClient::new(config.request_timeout, config.connect_timeout).unwrap();
    let store = DataApiStore::new(store_client, &StoreConfig::data_api(store_server.uri(), "test")).unwrap();
    let router = create_router(SearchService::with_store(&config, Arc::new(store)).unwrap());

    let (status, body) = send(&router, post_json("/api/search", &json!({"query": "q"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Search failed:"));

    let (status, body) = send(&router, get("/api/search/history")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to fetch search history");

    let (status, body) = send(&router, get("/api/papers/saved")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to fetch saved papers");

    let request = Request::builder().method("DELETE").uri("/api/search/history").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to clear search history");
}

#[tokio::test]
async fn test_malformed_search_body_is_rejected() {
    let server = mock_providers().await;
    let (status, _) = send(&router(&server), post_json("/api/search", &json!({"limit": 3}))).await;
    assert!(status.is_client_error());
}
