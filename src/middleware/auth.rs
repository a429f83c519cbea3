use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use starlink_auth::{AccessClaims, TokenRejection, extract_bearer, verify_access_token};
use starlink_core::AppError;
use starlink_observability::track_jwt_validation;

use crate::state::AppState;

/// Extractor that validates the bearer access token and provides its claims.
///
/// Rejections carry the machine-readable code clients branch on:
/// `token_missing`, `token_expired` or `token_invalid`. A token revoked by
/// logout is `token_invalid`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl AuthUser {
    /// Check if the user has a specific permission (`resource.action`)
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.0.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub).map_err(|_| AppError::token_invalid())
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn reject(rejection: TokenRejection) -> AppError {
    track_jwt_validation(rejection.as_str());
    rejection.into_app_error()
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = extract_bearer(auth_header).map_err(reject)?;
        let claims = verify_access_token(token, &state.jwt_config).map_err(reject)?;

        if state.revoked_tokens.is_revoked(&claims.jti) {
            return Err(reject(TokenRejection::Invalid));
        }

        track_jwt_validation("valid");
        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that requires one `resource.action` permission.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = starlink_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                $crate::middleware::role::check_permission(&auth_user, $permission)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(RequireUserRead, starlink_core::permissions::USER_READ);
