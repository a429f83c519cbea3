use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use starlink_core::{AppError, ApiResponse, ErrorBody};
use starlink_models::{
    ChangePasswordRequest, Credentials, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, UserProfile,
};
use tracing::instrument;

use super::model::MessageResponse;
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

type MessageReply = (StatusCode, Json<ApiResponse<()>>);

fn message(status: StatusCode, text: &str) -> MessageReply {
    (status, Json(ApiResponse::message(text)))
}

/// Register a new user with the default `Client` role
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
        (status = 429, description = "Too many requests")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<MessageReply, AppError> {
    AuthService::register_user(&state, dto).await?;
    Ok(message(StatusCode::CREATED, "User registered successfully"))
}

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 403, description = "Account is disabled", body = ErrorBody),
        (status = 429, description = "Too many requests")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = AuthService::login_user(&state, credentials).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorBody),
        (status = 429, description = "Too many requests")
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<RefreshTokenResponse>>, AppError> {
    let response = AuthService::refresh_access_token(&state, &dto.refresh_token).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Current user with effective roles and permissions
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let profile = AuthService::get_profile(&state, auth_user.user_id()?).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Revoke the presented access token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn logout_user(State(state): State<AppState>, auth_user: AuthUser) -> MessageReply {
    AuthService::logout_user(&state, &auth_user.0);
    message(StatusCode::OK, "Logged out successfully")
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorBody),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<MessageReply, AppError> {
    AuthService::change_password(&state, auth_user.user_id()?, dto).await?;
    Ok(message(StatusCode::OK, "Password changed successfully"))
}
