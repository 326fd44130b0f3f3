//! API Integration Tests
//!
//! Tests marked with #[ignore] require live Postgres and Redis backends.
//! To run them, provision both and run: cargo test -- --ignored

use authgate_api::auth::cache::TokenCache;
use authgate_api::auth::jwt::{decode_token, issue_token_pair, JwtConfig};
use authgate_api::auth::models::User;
use authgate_api::{create_router, AppState};
use authgate_core::AppConfig;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    let db = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:5432/authgate_test")
        .expect("lazy pool");
    let cache = TokenCache::from_url("redis://127.0.0.1:6379/").expect("cache client");

    Arc::new(AppState::new(
        AppConfig::default(),
        JwtConfig::default(),
        db,
        cache,
    ))
}

fn test_app() -> Router {
    create_router(test_state())
}

/// Helper to create a test request
fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn access_token_for(state: &AppState, is_superuser: bool) -> String {
    let user = User {
        id: 1,
        email: "admin@example.com".to_string(),
        password: "hash".to_string(),
        is_active: true,
        is_superuser,
        confirmed: false,
        created: Utc::now(),
        last_login: None,
    };
    issue_token_pair(&state.jwt, &user).unwrap().access_token
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(json_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// =============================================================================
// Register Validation Tests
// =============================================================================

#[tokio::test]
async fn test_register_password_mismatch() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/auth/v1/register",
            Some(json!({
                "email": "a@x.com",
                "password": "a",
                "password2": "b",
            })),
        ))
        .await
        .unwrap();

    // Rejected before any store write happens
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "PasswordsDontMatch: Fields password and password2 don't match"
    );
}

#[tokio::test]
async fn test_register_invalid_email() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/auth/v1/register",
            Some(json!({
                "email": "not-an-email",
                "password": "secret",
                "password2": "secret",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["message"].as_str().unwrap();
    assert!(message.starts_with("ValidationError:"), "{message}");
}

#[tokio::test]
async fn test_register_password_too_long() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/auth/v1/register",
            Some(json!({
                "email": "a@x.com",
                "password": "x".repeat(101),
                "password2": "x".repeat(101),
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["message"].as_str().unwrap();
    assert!(message.starts_with("ValidationError:"), "{message}");
}

#[tokio::test]
async fn test_register_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/v1/register")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["message"].as_str().unwrap();
    assert!(message.starts_with("BadRequest:"), "{message}");
}

#[tokio::test]
async fn test_login_missing_field() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/auth/v1/login",
            Some(json!({ "email": "a@x.com" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["message"].as_str().unwrap();
    assert!(message.starts_with("BadRequest:"), "{message}");
}

// =============================================================================
// Admin Authorization Tests
// =============================================================================

#[tokio::test]
async fn test_users_list_without_credentials() {
    let response = test_app()
        .oneshot(json_request("GET", "/auth/v1/users", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized: Authorization required");
}

#[tokio::test]
async fn test_users_list_with_garbage_token() {
    let request = Request::builder()
        .method("GET")
        .uri("/auth/v1/users")
        .header("Authorization", "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    // The bad token is discarded, so the request arrives unauthenticated
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_list_without_admin_scope() {
    let state = test_state();
    let token = access_token_for(&state, false);

    let request = Request::builder()
        .method("GET")
        .uri("/auth/v1/users")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = create_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Forbidden: Insufficient scope");
}

#[tokio::test]
async fn test_users_create_without_admin_scope() {
    let state = test_state();
    let token = access_token_for(&state, false);

    let request = Request::builder()
        .method("POST")
        .uri("/auth/v1/users")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({ "email": "b@x.com", "password": "secret" }).to_string(),
        ))
        .unwrap();

    let response = create_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_detail_without_credentials() {
    for method in ["GET", "DELETE"] {
        let response = test_app()
            .oneshot(json_request(method, "/auth/v1/users/1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method}");
    }
}

// =============================================================================
// End-to-end scenarios (require live backends)
// =============================================================================

#[tokio::test]
#[ignore = "requires Postgres and Redis"]
async fn test_register_login_refresh_flow() {
    let state = test_state();
    let email = format!("flow-{}@example.com", uuid_suffix());

    // Register
    let response = create_router(state.clone())
        .oneshot(json_request(
            "POST",
            "/auth/v1/register",
            Some(json!({
                "email": email,
                "password": "secret",
                "password2": "secret",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let registered = body_json(response).await;
    assert_eq!(registered["email"], email.as_str());
    assert_eq!(registered["is_active"], true);
    assert!(registered.get("password").is_none());

    // Login
    let response = create_router(state.clone())
        .oneshot(json_request(
            "POST",
            "/auth/v1/login",
            Some(json!({ "email": email, "password": "secret" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let tokens = body_json(response).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();
    let original = decode_token(&state.jwt, &refresh_token).unwrap();

    // Refresh
    let response = create_router(state.clone())
        .oneshot(json_request(
            "POST",
            "/auth/v1/refresh",
            Some(json!({ "refresh_token": refresh_token })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rotated = body_json(response).await;
    let new_access = decode_token(&state.jwt, rotated["access_token"].as_str().unwrap()).unwrap();

    assert_eq!(new_access.user_id, original.user_id);
    assert_eq!(new_access.email, original.email);
    assert_ne!(new_access.jti, original.jti);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_refresh_with_unknown_token() {
    let state = test_state();

    // A validly signed refresh token that was never registered in the cache
    let user = User {
        id: 99,
        email: "ghost@example.com".to_string(),
        password: "hash".to_string(),
        is_active: true,
        is_superuser: false,
        confirmed: false,
        created: Utc::now(),
        last_login: None,
    };
    let pair = issue_token_pair(&state.jwt, &user).unwrap();

    let response = create_router(state)
        .oneshot(json_request(
            "POST",
            "/auth/v1/refresh",
            Some(json!({ "refresh_token": pair.refresh_token })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "RefreshTokenNotFound: Refresh token not found");
}

fn uuid_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos()
        .to_string()
}
