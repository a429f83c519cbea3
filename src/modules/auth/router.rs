use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use super::controller::{
    change_password, get_me, login_user, logout_user, refresh_token, register_user,
};
use crate::state::AppState;

/// Auth routes. Login, register and refresh sit behind the auth rate
/// limiter when it is enabled.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let credential_routes = Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
        .route("/refresh", post(refresh_token));

    let credential_routes = match state.rate_limit_config.auth_governor_config() {
        Some(config) => credential_routes.layer(GovernorLayer::new(Arc::new(config))),
        None => credential_routes,
    };

    Router::new()
        .merge(credential_routes)
        .route("/me", get(get_me))
        .route("/logout", post(logout_user))
        .route("/change-password", post(change_password))
}
