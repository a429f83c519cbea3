//! User records and the role catalog.
//!
//! # Core Types
//!
//! - [`UserRecord`] - a stored account, including its password hash
//! - [`RoleCatalog`] - role name to `resource.action` grants
//!
//! Records never leave the server as-is; handlers convert them to a
//! [`UserProfile`] with the effective permissions resolved through the
//! catalog.

use chrono::{DateTime, Utc};
use starlink_core::permissions::default_grants;
use starlink_models::{Permission, Role, SeedUser, UserProfile};
use uuid::Uuid;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// A new active account with a fresh id.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            phone: None,
            is_active: true,
            roles,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[must_use]
    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Primary role for metric labels: the first one assigned.
    pub fn primary_role(&self) -> &str {
        self.roles.first().map(String::as_str).unwrap_or("none")
    }

    pub fn to_profile(&self, catalog: &RoleCatalog) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            is_active: Some(self.is_active),
            created_at: Some(self.created_at),
            last_login_at: self.last_login_at,
            roles: self.roles.iter().map(Role::new).collect(),
            permissions: catalog
                .permissions_for(&self.roles)
                .iter()
                .filter_map(|p| p.parse::<Permission>().ok())
                .collect(),
        }
    }
}

impl From<SeedUser> for UserRecord {
    fn from(seed: SeedUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: seed.email,
            password_hash: seed.password_hash,
            first_name: seed.first_name,
            last_name: seed.last_name,
            phone: seed.phone,
            is_active: seed.is_active,
            roles: seed.roles,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }
}

/// Role name to permission names, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: Vec<(String, Vec<String>)>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self {
            roles: default_grants()
                .into_iter()
                .map(|(role, perms)| {
                    (
                        role.to_string(),
                        perms.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl RoleCatalog {
    pub fn is_known(&self, role: &str) -> bool {
        self.roles.iter().any(|(name, _)| name == role)
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|(name, _)| name.as_str())
    }

    /// Union of the grants of `roles`, without duplicates, in first-seen
    /// order. Unknown roles grant nothing.
    pub fn permissions_for(&self, roles: &[String]) -> Vec<String> {
        let mut permissions: Vec<String> = Vec::new();
        for role in roles {
            let Some((_, grants)) = self.roles.iter().find(|(name, _)| name == role) else {
                continue;
            };
            for grant in grants {
                if !permissions.contains(grant) {
                    permissions.push(grant.clone());
                }
            }
        }
        permissions
    }
}
