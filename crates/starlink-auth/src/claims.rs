//! JWT claim structures.
//!
//! - [`AccessClaims`]: bearer token presented on every protected request
//! - [`RefreshClaims`]: long-lived token exchanged for a new access token
//!
//! Both carry a `typ` claim so one kind can never be replayed as the other.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims embedded in access tokens.
///
/// Roles and permissions are captured at issue time, so authorization
/// decisions need no directory lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessClaims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    /// Role names, e.g. `"Organization Admin"`
    #[serde(default)]
    pub roles: Vec<String>,
    /// Permission names in `resource.action` form
    #[serde(default)]
    pub permissions: Vec<String>,
    pub typ: TokenKind,
    /// Unique token identifier, used for revocation on logout
    pub jti: String,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
    /// Expiration (Unix timestamp)
    pub exp: usize,
}

impl AccessClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub email: String,
    pub typ: TokenKind,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}
