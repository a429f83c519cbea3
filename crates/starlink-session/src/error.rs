//! Session errors.
//!
//! Only [`SessionError::TokenExpired`] routes a request through the refresh
//! path. Every other variant is returned to the caller as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Login rejected by the issuer. Carries the issuer's message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("access token has expired")]
    TokenExpired,

    /// Bad signature, malformed, or revoked. Never triggers a refresh.
    #[error("access token is invalid")]
    TokenInvalid,

    #[error("no access token available")]
    TokenMissing,

    /// The refresh exchange failed and the session was terminated.
    #[error("session refresh failed, please log in again")]
    RefreshFailed,

    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx response.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Gave up waiting for a coalesced refresh.
    #[error("timed out waiting for session refresh")]
    Timeout,

    #[error("token storage error: {0}")]
    Storage(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl SessionError {
    /// Errors after which the caller should send the user to the login view.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::TokenInvalid | Self::TokenMissing | Self::RefreshFailed
        )
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
