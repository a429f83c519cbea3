use std::sync::Arc;

use starlink_config::{CorsConfig, JwtConfig, RateLimitConfig};
use tracing::{info, warn};

use crate::modules::auth::revocation::RevokedTokens;
use crate::modules::users::model::RoleCatalog;
use crate::modules::users::repository::{InMemoryUserRepository, UserRepository};
use crate::modules::users::service::UserService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<RoleCatalog>,
    pub revoked_tokens: RevokedTokens,
}

impl AppState {
    /// State with an empty in-memory user store.
    pub fn new(
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        Self {
            jwt_config,
            cors_config,
            rate_limit_config,
            users: Arc::new(InMemoryUserRepository::new()),
            roles: Arc::new(RoleCatalog::default()),
            revoked_tokens: RevokedTokens::new(),
        }
    }
}

/// Builds the state from the environment and seeds users.
///
/// - `INIT_DB=true` creates the default Super Admin
/// - `USERS_SEED_FILE` loads users written by `starlink-cli generate-seed`
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let state = AppState::new(
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    );

    let init_db = std::env::var("INIT_DB")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);
    if init_db {
        UserService::seed_default_admin(state.users.as_ref())
            .await
            .map_err(|e| e.error)?;
    }

    if let Ok(path) = std::env::var("USERS_SEED_FILE") {
        match UserService::load_seed_file(&path) {
            Ok(seeds) => {
                let inserted =
                    UserService::seed_users(state.users.as_ref(), &state.roles, seeds)
                        .await
                        .map_err(|e| e.error)?;
                info!(path = %path, inserted, "Loaded seed users");
            }
            Err(e) => warn!(path = %path, error = %e, "Could not load seed users"),
        }
    }

    Ok(state)
}
