//! Route-level access decisions over the session state.
//!
//! The guard never fetches anything; it maps a [`Session`] snapshot and a
//! requirement to a [`GuardDecision`]. An authenticated user who lacks a
//! role is sent to their own home view, not to the login page.

use starlink_core::permissions::{
    ROLE_ADMIN, ROLE_CLIENT, ROLE_ORGANIZATION_ADMIN, ROLE_SUPER_ADMIN, ROLE_SUPPORT,
    ROLE_TECHNICIAN, ROLE_VIEWER,
};
use starlink_models::{ParsePermissionError, Permission, UserProfile};

use crate::session::{Session, SessionStatus};

pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const DEFAULT_HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated session.
    Authenticated,
    Role(String),
    Permission(Permission),
}

impl Requirement {
    pub fn role(name: impl Into<String>) -> Self {
        Self::Role(name.into())
    }

    /// Parses a `resource.action` permission requirement.
    pub fn permission(text: &str) -> Result<Self, ParsePermissionError> {
        text.parse().map(Self::Permission)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still loading; show a waiting indicator.
    Wait,
    Allow,
    /// Not logged in. `return_to` is the path to resume after login.
    RedirectToLogin { return_to: String },
    /// Logged in but missing the required role.
    RedirectToHome(String),
    /// Logged in but missing the required permission.
    RedirectToUnauthorized(String),
}

#[derive(Debug, Clone)]
pub struct AuthGuard {
    login_path: String,
    unauthorized_path: String,
    default_home: String,
    /// Checked in order; the first role the user holds picks the home.
    role_homes: Vec<(String, String)>,
}

impl Default for AuthGuard {
    fn default() -> Self {
        let role_homes = [
            (ROLE_SUPER_ADMIN, "/admin"),
            (ROLE_ADMIN, "/admin"),
            (ROLE_ORGANIZATION_ADMIN, "/organization"),
            (ROLE_TECHNICIAN, "/technician"),
            (ROLE_SUPPORT, "/support"),
            (ROLE_VIEWER, "/viewer"),
            (ROLE_CLIENT, "/client"),
        ]
        .into_iter()
        .map(|(role, home)| (role.to_string(), home.to_string()))
        .collect();

        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            default_home: DEFAULT_HOME_PATH.to_string(),
            role_homes,
        }
    }
}

impl AuthGuard {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    /// Adds or replaces the home view for a role. New roles are checked
    /// after the built-in ones.
    #[must_use]
    pub fn with_role_home(mut self, role: impl Into<String>, home: impl Into<String>) -> Self {
        let role = role.into();
        let home = home.into();
        match self.role_homes.iter_mut().find(|(r, _)| *r == role) {
            Some(entry) => entry.1 = home,
            None => self.role_homes.push((role, home)),
        }
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn home_for(&self, user: &UserProfile) -> &str {
        self.role_homes
            .iter()
            .find(|(role, _)| user.has_role(role))
            .map(|(_, home)| home.as_str())
            .unwrap_or(self.default_home.as_str())
    }

    pub fn evaluate(
        &self,
        session: &Session,
        requested_path: &str,
        requirement: &Requirement,
    ) -> GuardDecision {
        match session.status {
            SessionStatus::Loading => return GuardDecision::Wait,
            SessionStatus::Unauthenticated => {
                return GuardDecision::RedirectToLogin {
                    return_to: requested_path.to_string(),
                };
            }
            SessionStatus::Authenticated => {}
        }

        let Some(user) = session.user.as_deref() else {
            return GuardDecision::RedirectToLogin {
                return_to: requested_path.to_string(),
            };
        };

        match requirement {
            Requirement::Authenticated => GuardDecision::Allow,
            Requirement::Role(role) if user.has_role(role) => GuardDecision::Allow,
            Requirement::Role(_) => GuardDecision::RedirectToHome(self.home_for(user).to_string()),
            Requirement::Permission(p) if user.has_permission(&p.resource, &p.action) => {
                GuardDecision::Allow
            }
            Requirement::Permission(_) => {
                GuardDecision::RedirectToUnauthorized(self.unauthorized_path.clone())
            }
        }
    }
}
