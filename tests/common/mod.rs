#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use starlink::modules::users::model::UserRecord;
use starlink::router::init_router;
use starlink::state::AppState;
use starlink_config::{CorsConfig, JwtConfig, RateLimitConfig};
use starlink_core::hash_password_with_cost;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 86_400,
    }
}

pub fn test_state() -> AppState {
    test_state_with_rate_limit(RateLimitConfig::disabled())
}

pub fn test_state_with_rate_limit(rate_limit_config: RateLimitConfig) -> AppState {
    AppState::new(
        jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config,
    )
}

pub fn setup_test_app(state: &AppState) -> Router {
    init_router(state.clone())
}

/// Inserts a user directly into the state's repository.
pub async fn create_test_user(
    state: &AppState,
    email: &str,
    password: &str,
    roles: &[&str],
) -> UserRecord {
    let hashed = hash_password_with_cost(password, 4).unwrap();
    let user = UserRecord::new(email, hashed, roles.iter().map(|r| r.to_string()).collect())
        .with_names(Some("Test".to_string()), Some("User".to_string()));
    state.users.insert(user).await.unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Logs in and returns the `data` of the response.
pub async fn login(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"].clone()
}
