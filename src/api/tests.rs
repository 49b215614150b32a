//! Router tests over the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use super::{AppState, RouterBuilder};
use crate::service::JwtService;
use crate::store::MemoryStore;

const SECRET: &str = "test_secret_key_that_is_long_enough_for_hs256";
const ISSUER: &str = "webapp-api";
const PASSWORD: &str = "SecurePass123";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let jwt_service = Arc::new(JwtService::new(SECRET, ISSUER));
        let state = AppState::new(store.clone(), store, jwt_service, 4);
        let router = RouterBuilder::with_all_routes().build(state.clone());
        Self { router, state }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            // Extractor rejections answer with plain text
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn register(&self, name: &str, email: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in; returns (user id, token)
    async fn signed_in(&self, name: &str, email: &str) -> (String, String) {
        let user = self.register(name, email).await;
        let token = self.login(email).await;
        (user["id"].as_str().unwrap().to_string(), token)
    }

    async fn admin(&self) -> (String, String) {
        let admin = self
            .state
            .user_service
            .create_admin("Admin", "admin@example.com", PASSWORD)
            .await
            .unwrap();
        (admin.id.to_string(), self.login("admin@example.com").await)
    }

    async fn create_item(&self, token: &str, title: &str, price: f64) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/items",
                Some(token),
                Some(json!({ "title": title, "description": format!("{} description", title), "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/nothing", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let app = TestApp::new();
    let user = app.register("Alice", "Alice@Example.com").await;

    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "ALICE@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Alice", "email": "alice@example.com", "password": "short" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_issues_token_for_profile() {
    let app = TestApp::new();
    let (user_id, token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, body) = app
        .send(Method::GET, "/api/auth/profile", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = TestApp::new();
    app.register("Alice", "alice@example.com").await;

    let (status, wrong_password) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "WrongPass123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same message either way so registered emails are not revealed
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/auth/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_expired_token_unauthorized() {
    let app = TestApp::new();
    let user = app.register("Alice", "alice@example.com").await;
    let user_id = user["id"].as_str().unwrap().parse().unwrap();

    let short_lived = JwtService::with_expiration(SECRET, ISSUER, Duration::seconds(-60));
    let token = short_lived
        .issue_token(user_id, crate::models::Role::User)
        .unwrap()
        .access_token;

    let (status, _) = app
        .send(Method::GET, "/api/auth/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_unauthorized() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("Alice", "alice@example.com").await;

    // Genuine header and claims, signature from a different key
    let forged = JwtService::new("another_secret_key_that_is_long_enough_too", ISSUER)
        .issue_token(uuid::Uuid::new_v4(), crate::models::Role::Admin)
        .unwrap()
        .access_token;
    let (header_and_payload, _) = token.rsplit_once('.').unwrap();
    let (_, forged_signature) = forged.rsplit_once('.').unwrap();
    let tampered = format!("{}.{}", header_and_payload, forged_signature);

    let (status, _) = app
        .send(Method::GET, "/api/auth/profile", Some(&tampered), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_requires_admin() {
    let app = TestApp::new();
    let (_, user_token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, body) = app
        .send(Method::GET, "/api/users", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app.send(Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, admin_token) = app.admin().await;
    let (status, body) = app
        .send(Method::GET, "/api/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_owner_or_admin_access() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;
    let (bob_id, _) = app.signed_in("Bob", "bob@example.com").await;
    let (_, admin_token) = app.admin().await;

    let own = format!("/api/users/{}", alice_id);
    let other = format!("/api/users/{}", bob_id);

    let (status, _) = app.send(Method::GET, &own, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, &other, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::PUT, &other, Some(&alice_token), Some(json!({ "name": "Hacked" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::PUT, &other, Some(&admin_token), Some(json!({ "name": "Robert" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Robert");
}

#[tokio::test]
async fn test_user_cannot_promote_self() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/users/{}", alice_id),
            Some(&alice_token),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_user_password_changes_login() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/users/{}", alice_id),
            Some(&alice_token),
            Some(json!({ "password": "NewPassword456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "NewPassword456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_user_removes_owned_items() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;
    let item = app.create_item(&alice_token, "Lamp", 10.0).await;

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/users/{}", alice_id),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/items/{}", item["id"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_of_deleted_account_cannot_create_items() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/users/{}", alice_id),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/items",
            Some(&alice_token),
            Some(json!({ "title": "Lamp", "description": "", "price": 10.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", body);
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");

    let (status, body) = app.send(Method::GET, "/api/items", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_item_create_then_get() {
    let app = TestApp::new();
    let (alice_id, alice_token) = app.signed_in("Alice", "alice@example.com").await;

    let created = app.create_item(&alice_token, "  Desk lamp ", 24.5).await;
    assert_eq!(created["title"], "Desk lamp");
    assert_eq!(created["owner_id"], alice_id.as_str());

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/items/{}", created["id"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_item_create_requires_token() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/items",
            None,
            Some(json!({ "title": "Lamp", "price": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_item_create_rejects_negative_price() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("Alice", "alice@example.com").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/items",
            Some(&token),
            Some(json!({ "title": "Lamp", "price": -1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_list_sort_search_and_paging() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("Alice", "alice@example.com").await;
    app.create_item(&token, "Desk lamp", 24.5).await;
    app.create_item(&token, "Floor lamp", 79.0).await;
    app.create_item(&token, "Bookshelf", 120.0).await;

    let (status, body) = app
        .send(Method::GET, "/api/items?search=LAMP&sort=-price", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Floor lamp", "Desk lamp"]);
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app
        .send(Method::GET, "/api/items?sort=price&limit=2&page=2", None, None)
        .await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["title"], "Bookshelf");
}

#[tokio::test]
async fn test_item_list_rejects_unknown_sort() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/api/items?sort=owner", None, None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_item_owner_or_admin_may_modify() {
    let app = TestApp::new();
    let (_, alice_token) = app.signed_in("Alice", "alice@example.com").await;
    let (_, bob_token) = app.signed_in("Bob", "bob@example.com").await;
    let (_, admin_token) = app.admin().await;

    let item = app.create_item(&alice_token, "Lamp", 10.0).await;
    let uri = format!("/api/items/{}", item["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&bob_token), Some(json!({ "price": 1.0 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&alice_token), Some(json!({ "price": 12.5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 12.5);
    assert_eq!(body["data"]["title"], "Lamp");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_invalid_id_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .send(Method::GET, "/api/items/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_overlong_email_rejected() {
    let app = TestApp::new();
    let email = format!("{}@example.com", "a".repeat(310));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Alice", "email": email, "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_security_headers_applied() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_readonly_router_hides_writes() {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store,
        Arc::new(JwtService::new(SECRET, ISSUER)),
        4,
    );
    let router = RouterBuilder::with_readonly_routes().build(state);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
