//! Integration tests for the Codemarket HTTP client

use codemarket_core::TokenPair;
use codemarket_http::{ClientError, MarketClient, TokenStore};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = MarketClient::builder()
        .base_url("http://localhost:8000/api/v1/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = MarketClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(|req: &Request| {
            let authorized = req.headers.contains_key("authorization");
            ResponseTemplate::new(200).set_body_json(json!({ "authorized": authorized }))
        })
        .mount(&mock_server)
        .await;

    let client = MarketClient::new(mock_server.uri(), TokenStore::in_memory()).unwrap();
    let request = client.request(reqwest::Method::GET, "/auth/me");
    let body: Value = client.execute(request).await.unwrap();
    assert_eq!(body["authorized"], false);
}

#[tokio::test]
async fn test_token_is_read_at_request_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::in_memory();
    let client = MarketClient::new(mock_server.uri(), tokens.clone()).unwrap();

    // Saved after the client was built
    tokens.save(&TokenPair::new("T1", "T2")).unwrap();

    let request = client.request(reqwest::Method::GET, "/auth/me");
    let body: Value = client.execute(request).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_unauthorized_propagates_with_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = TokenStore::in_memory();
    tokens.save(&TokenPair::new("expired", "R")).unwrap();
    let client = MarketClient::new(mock_server.uri(), tokens).unwrap();

    let result = client.auth().me().await;
    let err = result.unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationFailed(_)));
    assert_eq!(err.detail(), Some("Could not validate credentials"));
}

#[tokio::test]
async fn test_error_status_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Product not found" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let client = MarketClient::builder()
        .base_url(mock_server.uri())
        .query_policy(codemarket_http::QueryPolicy {
            retries: 0,
            stale_time_secs: 300,
        })
        .build()
        .unwrap();

    let err = client.products().get(404).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(err.detail(), Some("Product not found"));

    let product = codemarket_core::ProductDraft::new("Kit", "Starter kit", 5.0).to_create(vec![]);
    let err = client.products().create(&product).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(err.detail().is_none());
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "not-a-number" })))
        .mount(&mock_server)
        .await;

    let client = MarketClient::new(mock_server.uri(), TokenStore::in_memory()).unwrap();
    let result = client.auth().me().await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}
