mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Router, middleware};
use common::{body_json, test_state};
use starlink::middleware::role::{RequireAdmin, RequireSuperAdmin, require_admin};
use starlink::state::AppState;
use starlink_auth::create_access_token;
use starlink_core::permissions::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_TECHNICIAN};
use tower::ServiceExt;
use uuid::Uuid;

fn admin_app(state: &AppState) -> Router {
    let layered = Router::new()
        .route("/layered", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/super-admin", get(|_: RequireSuperAdmin| async { "ok" }))
        .route("/admin", get(|_: RequireAdmin| async { "ok" }))
        .merge(layered)
        .with_state(state.clone())
}

fn token_for(state: &AppState, role: &str) -> String {
    create_access_token(
        Uuid::new_v4(),
        "staff@example.com",
        vec![role.to_string()],
        vec![],
        &state.jwt_config,
    )
    .unwrap()
}

async fn get_as(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    if status == StatusCode::OK {
        return (status, serde_json::Value::Null);
    }
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_require_super_admin_extractor() {
    let state = test_state();
    let app = admin_app(&state);

    let (status, _) = get_as(&app, "/super-admin", Some(&token_for(&state, ROLE_SUPER_ADMIN))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_as(&app, "/super-admin", Some(&token_for(&state, ROLE_ADMIN))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");
}

#[tokio::test]
async fn test_require_admin_extractor() {
    let state = test_state();
    let app = admin_app(&state);

    let (status, _) = get_as(&app, "/admin", Some(&token_for(&state, ROLE_ADMIN))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_as(&app, "/admin", Some(&token_for(&state, ROLE_TECHNICIAN))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");
}

#[tokio::test]
async fn test_require_admin_middleware() {
    let state = test_state();
    let app = admin_app(&state);

    let (status, _) = get_as(&app, "/layered", Some(&token_for(&state, ROLE_SUPER_ADMIN))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_as(&app, "/layered", Some(&token_for(&state, ROLE_TECHNICIAN))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");

    let (status, body) = get_as(&app, "/layered", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_missing");
}

#[tokio::test]
async fn test_staff_route_layer_on_users() {
    let state = test_state();
    let app = common::setup_test_app(&state);

    let (status, body) = get_as(&app, "/api/users", Some(&token_for(&state, "Client"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");

    let viewer = create_access_token(
        Uuid::new_v4(),
        "viewer@example.com",
        vec!["Viewer".to_string()],
        vec!["user.read".to_string()],
        &state.jwt_config,
    )
    .unwrap();
    let (status, _) = get_as(&app, "/api/users", Some(&viewer)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_as(&app, "/api/users", Some(&token_for(&state, "Viewer"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");
}
