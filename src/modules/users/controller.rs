use axum::Json;
use axum::extract::{Path, State};
use starlink_core::{AppError, ApiResponse, ErrorBody};
use starlink_models::UserProfile;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::RequireUserRead;
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// List all users (requires `user.read`)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserProfile>),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _auth: RequireUserRead,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    let users = UserService::get_users(state.users.as_ref(), &state.roles).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// Get a user by ID (requires `user.read`)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserProfile),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: RequireUserRead,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), &state.roles, id).await?;
    Ok(Json(ApiResponse::success(user)))
}
