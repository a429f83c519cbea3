//! Application error type with HTTP response conversion.
//!
//! [`AppError`] pairs an HTTP status with an [`anyhow::Error`] and an optional
//! machine-readable [`ErrorCode`]. Clients rely on the code (not the message)
//! to decide how to react to a 401, so every authentication failure carries
//! one.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::response::ErrorBody;

/// Machine-readable reason attached to error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The access token is past its `exp` claim. The only code that
    /// triggers a client-side refresh.
    TokenExpired,
    /// Bad signature, malformed token, wrong token type, or revoked token.
    TokenInvalid,
    /// No bearer token was presented on a protected route.
    TokenMissing,
    /// Login rejected: unknown email or wrong password.
    InvalidCredentials,
    /// Login rejected: the account exists but is disabled.
    AccountDisabled,
    /// Authenticated but lacking the required role or permission.
    InsufficientPermissions,
    /// Any code this build does not know about.
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TokenExpired => "token_expired",
            ErrorCode::TokenInvalid => "token_invalid",
            ErrorCode::TokenMissing => "token_missing",
            ErrorCode::InvalidCredentials => "invalid_credentials",
            ErrorCode::AccountDisabled => "account_disabled",
            ErrorCode::InsufficientPermissions => "insufficient_permissions",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: Option<ErrorCode>,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: None,
            error: err.into(),
        }
    }

    /// Attaches a machine-readable code to the error.
    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
            .with_code(ErrorCode::InsufficientPermissions)
    }

    pub fn token_expired() -> Self {
        Self::unauthorized("Token has expired".to_string()).with_code(ErrorCode::TokenExpired)
    }

    pub fn token_invalid() -> Self {
        Self::unauthorized("Invalid token".to_string()).with_code(ErrorCode::TokenInvalid)
    }

    pub fn token_missing() -> Self {
        Self::unauthorized("Authorization token is missing".to_string())
            .with_code(ErrorCode::TokenMissing)
    }

    pub fn invalid_credentials() -> Self {
        Self::unauthorized("Invalid email or password".to_string())
            .with_code(ErrorCode::InvalidCredentials)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = ?self.error, "request failed");
        }

        let body = ErrorBody::new(self.error.to_string(), self.code);
        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
