//! Configuration and client tests.
//!
//! Tests actual behavior, not constants.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_aggregator::client::HttpClient;
use paper_aggregator::config::{Config, StoreBackend, StoreConfig};
use paper_aggregator::error::ProviderError;
use paper_aggregator::service::SearchService;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_default_has_no_api_key() {
    let config = Config::default();
    assert!(!config.has_api_key());
    assert!(config.crossref_mailto.is_none());
}

#[test]
fn test_config_with_api_key() {
    let config = Config::new(Some("test-key".to_string()), Some("me@example.org".to_string()));
    assert!(config.has_api_key());
    assert_eq!(config.semantic_scholar_api_key.as_deref(), Some("test-key"));
    assert_eq!(config.crossref_mailto.as_deref(), Some("me@example.org"));
}

#[test]
fn test_config_clone_preserves_api_key() {
    let config = Config::new(Some("secret".to_string()), None);
    let cloned = config.clone();
    assert_eq!(config.semantic_scholar_api_key, cloned.semantic_scholar_api_key);
}

#[test]
fn test_store_config_data_api() {
    let store = StoreConfig::data_api("http://localhost:9000", "academic");
    assert_eq!(store.backend, StoreBackend::DataApi);
    assert_eq!(store.url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(store.database, "academic");
}

#[test]
fn test_service_rejects_data_api_without_url() {
    let mut config = Config::default();
    config.store.backend = StoreBackend::DataApi;
    assert!(SearchService::from_config(&config).is_err());
}

#[test]
fn test_service_from_default_config() {
    assert!(SearchService::from_config(&Config::default()).is_ok());
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_is_cloneable() {
    let client = HttpClient::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
    let cloned = client.clone();
    assert_eq!(client.request_timeout(), cloned.request_timeout());
}

#[tokio::test]
async fn test_get_json_sends_params_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo"))
        .and(query_param("query", "a b"))
        .and(header("x-api-key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(Duration::from_secs(5), Duration::from_secs(2)).unwrap();
    let body = client
        .get_json(
            &format!("{}/echo", mock_server.uri()),
            &[("query".to_string(), "a b".to_string())],
            &[("x-api-key", "k".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_get_json_status_error_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(Duration::from_secs(5), Duration::from_secs(2)).unwrap();
    let err = client.get_json(&mock_server.uri(), &[], &[]).await.unwrap_err();

    assert!(matches!(err, ProviderError::Status { status: 400, ref message } if message == "bad query"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_get_json_html_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(Duration::from_secs(5), Duration::from_secs(2)).unwrap();
    let err = client.get_json(&mock_server.uri(), &[], &[]).await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[tokio::test]
async fn test_get_json_connection_refused_is_transport_error() {
    let client = HttpClient::new(Duration::from_secs(2), Duration::from_secs(1)).unwrap();
    let err = client.get_json("http://127.0.0.1:1/unreachable", &[], &[]).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_) | ProviderError::Middleware(_)));
}
