//! Request shapes produced by the service wrappers

use codemarket_core::{FilePayload, ProductQuery, RegisterRequest, UserRole};
use codemarket_http::{MarketClient, TokenStore};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> MarketClient {
    MarketClient::new(server.uri(), TokenStore::in_memory()).unwrap()
}

#[tokio::test]
async fn test_login_sends_password_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=a%40b.com"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T1",
            "refresh_token": "T2",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .await
        .auth()
        .login("a@b.com", "secret")
        .await
        .unwrap();
    assert_eq!(response.access_token, "T1");
    assert_eq!(response.refresh_token, "T2");
}

#[tokio::test]
async fn test_register_posts_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "email": "bob@example.com",
            "username": "bob",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "email": "bob@example.com",
            "username": "bob",
            "role": "buyer",
            "is_verified": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RegisterRequest {
        email: "bob@example.com".into(),
        username: "bob".into(),
        password: "hunter22".into(),
        full_name: None,
    };
    let user = client(&mock_server)
        .await
        .auth()
        .register(&request)
        .await
        .unwrap();
    assert_eq!(user.id, 9);
    assert_eq!(user.role, UserRole::Buyer);
    assert!(!user.is_verified);
}

#[tokio::test]
async fn test_password_reset_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password-reset"))
        .and(body_json(json!({ "email": "ann@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "If the email exists, a reset link has been sent"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/password-reset/confirm"))
        .and(body_json(json!({ "token": "tok", "new_password": "n3wpass" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Password successfully reset" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .and(body_json(json!({ "token": "verify-me" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Email successfully verified" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client(&mock_server).await.auth();
    let reset = auth.request_password_reset("ann@example.com").await.unwrap();
    assert!(reset.message.starts_with("If the email exists"));
    let confirmed = auth.confirm_password_reset("tok", "n3wpass").await.unwrap();
    assert_eq!(confirmed.message, "Password successfully reset");
    let verified = auth.verify_email("verify-me").await.unwrap();
    assert_eq!(verified.message, "Email successfully verified");
}

#[tokio::test]
async fn test_refresh_posts_refresh_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "R1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server).await.auth().refresh("R1").await.unwrap();
    assert_eq!(response.access_token, "A2");
    assert_eq!(response.token_type, "bearer");
}

#[tokio::test]
async fn test_product_list_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("q", "crm"))
        .and(query_param("category_id", "3"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 11,
                "title": "Rust CRM",
                "slug": "rust-crm",
                "price": 49.0,
                "currency": "USD",
                "rating": 4.5,
                "total_reviews": 12,
                "demo_url": null,
                "created_at": "2024-05-01T10:00:00"
            }],
            "total": 11,
            "page": 2,
            "page_size": 10
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ProductQuery {
        q: Some("crm".into()),
        category_id: Some(3),
        page: Some(2),
        page_size: Some(10),
    };
    let page = client(&mock_server)
        .await
        .products()
        .list(&query)
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "Rust CRM");
    assert_eq!(page.total_pages(), 2);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_upload_is_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"kit.zip\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "kit.zip",
            "stored_as": "4f1c.zip",
            "size": 5
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = FilePayload::new("kit.zip", b"hello".to_vec()).with_content_type("application/zip");
    let stored = client(&mock_server)
        .await
        .upload()
        .upload_file(file)
        .await
        .unwrap();
    assert_eq!(stored.stored_as, "4f1c.zip");
    assert_eq!(stored.size, 5);
}

#[tokio::test]
async fn test_admin_listings_are_raw_json() {
    let mock_server = MockServer::start().await;

    for endpoint in ["users", "products", "transactions"] {
        Mock::given(method("GET"))
            .and(path(format!("/admin/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "kind": endpoint }])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let admin = client(&mock_server).await.admin();
    assert_eq!(admin.users().await.unwrap()[0]["kind"], "users");
    assert_eq!(admin.products().await.unwrap()[0]["kind"], "products");
    assert_eq!(admin.transactions().await.unwrap()[0]["kind"], "transactions");
}
