use anyhow::anyhow;
use axum::http::StatusCode;
use chrono::Utc;
use starlink_auth::{
    AccessClaims, create_access_token, create_refresh_token, verify_refresh_token,
};
use starlink_core::permissions::ROLE_CLIENT;
use starlink_core::{AppError, ErrorCode, hash_password, verify_password};
use starlink_models::{
    ChangePasswordRequest, Credentials, LoginResponse, RefreshTokenResponse, RegisterRequest,
    UserProfile,
};
use starlink_observability::{
    track_jwt_issued, track_login_failure, track_login_success, track_token_refresh,
    track_user_registered,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::users::model::UserRecord;
use crate::state::AppState;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(state))]
    pub async fn register_user(
        state: &AppState,
        dto: RegisterRequest,
    ) -> Result<UserProfile, AppError> {
        if state.users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict(anyhow!("Email already registered")));
        }

        let hashed_password = hash_password(&dto.password)?;
        let user = UserRecord::new(dto.email, hashed_password, vec![ROLE_CLIENT.to_string()])
            .with_names(dto.first_name, dto.last_name)
            .with_phone(dto.phone);

        let user = state.users.insert(user).await?;
        track_user_registered(ROLE_CLIENT);
        info!(user_id = %user.id, "User registered");

        Ok(user.to_profile(&state.roles))
    }

    /// Verifies credentials and issues an access/refresh token pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// A disabled account is rejected only after the password matched.
    #[instrument(skip(state), fields(email = %credentials.identifier))]
    pub async fn login_user(
        state: &AppState,
        credentials: Credentials,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = state.users.find_by_email(&credentials.identifier).await? else {
            track_login_failure("unknown_user");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&credentials.secret, &user.password_hash)? {
            track_login_failure("wrong_password");
            return Err(AppError::invalid_credentials());
        }

        if !user.is_active {
            track_login_failure("account_disabled");
            return Err(
                AppError::new(StatusCode::FORBIDDEN, anyhow!("Account is disabled"))
                    .with_code(ErrorCode::AccountDisabled),
            );
        }

        let now = Utc::now();
        state.users.record_login(user.id, now).await?;

        let access_token = Self::issue_access_token(state, &user)?;
        let refresh_token = create_refresh_token(user.id, &user.email, &state.jwt_config)?;
        track_jwt_issued("refresh");
        track_login_success(user.primary_role());

        let mut profile = user.to_profile(&state.roles);
        profile.last_login_at = Some(now);

        Ok(LoginResponse {
            user: profile,
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token. The user is re-read
    /// so the new token carries current roles; disabled or deleted users
    /// cannot refresh. The refresh token itself is not rotated.
    #[instrument(skip_all)]
    pub async fn refresh_access_token(
        state: &AppState,
        refresh_token: &str,
    ) -> Result<RefreshTokenResponse, AppError> {
        let result = Self::refresh_inner(state, refresh_token).await;
        track_token_refresh(result.is_ok());
        result
    }

    async fn refresh_inner(
        state: &AppState,
        refresh_token: &str,
    ) -> Result<RefreshTokenResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, &state.jwt_config).map_err(|rejection| {
            warn!(reason = %rejection, "Refresh token rejected");
            invalid_refresh_token()
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid_refresh_token())?;
        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(invalid_refresh_token)?;

        let access_token = Self::issue_access_token(state, &user)?;
        Ok(RefreshTokenResponse { access_token })
    }

    #[instrument(skip(state))]
    pub async fn get_profile(state: &AppState, user_id: Uuid) -> Result<UserProfile, AppError> {
        state
            .users
            .find_by_id(user_id)
            .await?
            .map(|u| u.to_profile(&state.roles))
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Revokes the presented access token until it expires.
    #[instrument(skip_all, fields(user_id = %claims.sub))]
    pub fn logout_user(state: &AppState, claims: &AccessClaims) {
        state.revoked_tokens.revoke(&claims.jti, claims.exp);
        info!("User logged out");
    }

    #[instrument(skip(state))]
    pub async fn change_password(
        state: &AppState,
        user_id: Uuid,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &user.password_hash)? {
            return Err(AppError::bad_request(anyhow!(
                "Current password is incorrect"
            )));
        }

        let hashed_password = hash_password(&dto.new_password)?;
        state.users.update_password(user.id, hashed_password).await?;
        info!("Password changed");
        Ok(())
    }

    fn issue_access_token(state: &AppState, user: &UserRecord) -> Result<String, AppError> {
        let permissions = state.roles.permissions_for(&user.roles);
        let token = create_access_token(
            user.id,
            &user.email,
            user.roles.clone(),
            permissions,
            &state.jwt_config,
        )?;
        track_jwt_issued("access");
        Ok(token)
    }
}

fn invalid_refresh_token() -> AppError {
    AppError::unauthorized("Invalid or expired refresh token".to_string())
        .with_code(ErrorCode::TokenInvalid)
}
