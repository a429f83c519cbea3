//! Role and permission authorization for Axum
//!
//! This module provides multiple approaches for access control:
//! 1. Layer-based middleware using [`require_roles`] and its named helpers
//! 2. Extractors such as [`RequireAdmin`]
//! 3. Helper functions for manual checks in handlers
//!
//! Every denial is a 403 with code `insufficient_permissions`.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use starlink_core::AppError;
use starlink_core::permissions::{
    ROLE_ADMIN, ROLE_ORGANIZATION_ADMIN, ROLE_SUPER_ADMIN, ROLE_SUPPORT, ROLE_TECHNICIAN,
    ROLE_VIEWER,
};
use starlink_observability::track_authorization_check;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Roles allowed to use administrative routes.
pub const ADMIN_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_ADMIN];

/// Every role except `Client`.
pub const STAFF_ROLES: &[&str] = &[
    ROLE_SUPER_ADMIN,
    ROLE_ADMIN,
    ROLE_ORGANIZATION_ADMIN,
    ROLE_TECHNICIAN,
    ROLE_SUPPORT,
    ROLE_VIEWER,
];

/// Checks that the authenticated user has one of `allowed_roles`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let protected_routes = Router::new()
///     .route("/reports", get(reports_handler))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, &[ROLE_TECHNICIAN]),
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[&str],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Super Admin and Admin only.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/settings", get(settings_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, ADMIN_ROLES).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Any staff role; clients are turned away.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, STAFF_ROLES).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor for Super Admin only routes.
#[derive(Debug, Clone)]
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, ROLE_SUPER_ADMIN)?;
        Ok(RequireSuperAdmin(auth_user))
    }
}

/// Extractor for admin-level access (Super Admin or Admin)
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, ADMIN_ROLES)?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Helper function to check a single role in controller logic
///
/// ```rust,ignore
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_role(&auth_user, ROLE_SUPER_ADMIN)?;
///     // Handler logic
/// }
/// ```
pub fn check_role(auth_user: &AuthUser, required_role: &str) -> Result<(), AppError> {
    let allowed = auth_user.has_role(required_role);
    track_authorization_check(allowed, required_role);

    if !allowed {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {}",
            required_role
        )));
    }

    Ok(())
}

/// An empty `allowed_roles` denies everyone.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[&str]) -> Result<(), AppError> {
    let allowed = auth_user.has_any_role(allowed_roles);
    track_authorization_check(allowed, "role");

    if !allowed {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}",
            allowed_roles.join(", ")
        )));
    }

    Ok(())
}

pub fn check_permission(auth_user: &AuthUser, permission: &str) -> Result<(), AppError> {
    let allowed = auth_user.has_permission(permission);
    track_authorization_check(allowed, permission);

    if !allowed {
        return Err(AppError::forbidden(format!(
            "Access denied. Missing required permission: {}",
            permission
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_not_staff() {
        assert!(!STAFF_ROLES.contains(&starlink_core::permissions::ROLE_CLIENT));
        assert!(ADMIN_ROLES.iter().all(|r| STAFF_ROLES.contains(r)));
    }
}
