//! Immutable views of the session state.

use std::sync::Arc;

use starlink_models::{TokenPair, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Stored tokens are being checked.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// A snapshot of the session. The profile is shared and replaced wholesale,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct Session {
    pub status: SessionStatus,
    pub user: Option<Arc<UserProfile>>,
    pub tokens: Option<TokenPair>,
    /// Message of the last failed login or of the termination reason.
    pub error: Option<String>,
}

impl Session {
    pub(crate) fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            user: None,
            tokens: None,
            error: None,
        }
    }

    pub(crate) fn unauthenticated(error: Option<String>) -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
            tokens: None,
            error,
        }
    }

    pub(crate) fn authenticated(user: Arc<UserProfile>, tokens: TokenPair) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
            tokens: Some(tokens),
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_role(name))
    }

    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.has_permission(resource, action))
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.refresh_token.as_str())
    }
}

/// Lifecycle notifications published by the
/// [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    Refreshed,
    LoggedOut,
    /// The session ended without a logout, typically a failed refresh. The
    /// caller should send the user back to the login view.
    Terminated { reason: String },
}
