//! Role and permission catalog for the Starlink Platform.
//!
//! Permissions are `resource.action` pairs. Checks compare the pair exactly;
//! there is no wildcard and no hierarchy between actions.
//!
//! # Example
//!
//! ```ignore
//! use starlink_core::permissions;
//!
//! if auth_user.has_permission(permissions::DEVICE_READ) {
//!     // list devices
//! }
//! ```

// =============================================================================
// Roles
// =============================================================================

pub const ROLE_SUPER_ADMIN: &str = "Super Admin";
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_ORGANIZATION_ADMIN: &str = "Organization Admin";
pub const ROLE_TECHNICIAN: &str = "Technician";
pub const ROLE_SUPPORT: &str = "Support";
pub const ROLE_VIEWER: &str = "Viewer";
/// Default role assigned at registration.
pub const ROLE_CLIENT: &str = "Client";

// =============================================================================
// User management
// =============================================================================

pub const USER_CREATE: &str = "user.create";
pub const USER_READ: &str = "user.read";
pub const USER_UPDATE: &str = "user.update";
pub const USER_DELETE: &str = "user.delete";

// =============================================================================
// Organization management
// =============================================================================

pub const ORGANIZATION_CREATE: &str = "organization.create";
pub const ORGANIZATION_READ: &str = "organization.read";
pub const ORGANIZATION_UPDATE: &str = "organization.update";
pub const ORGANIZATION_DELETE: &str = "organization.delete";

// =============================================================================
// Device management
// =============================================================================

pub const DEVICE_CREATE: &str = "device.create";
pub const DEVICE_READ: &str = "device.read";
pub const DEVICE_UPDATE: &str = "device.update";
pub const DEVICE_DELETE: &str = "device.delete";

// =============================================================================
// Telemetry
// =============================================================================

pub const TELEMETRY_READ: &str = "telemetry.read";
pub const TELEMETRY_SYNC: &str = "telemetry.sync";

// =============================================================================
// Support
// =============================================================================

pub const SUPPORT_CREATE: &str = "support.create";
pub const SUPPORT_READ: &str = "support.read";
pub const SUPPORT_UPDATE: &str = "support.update";
pub const SUPPORT_DELETE: &str = "support.delete";

// =============================================================================
// Notifications
// =============================================================================

pub const NOTIFICATION_CREATE: &str = "notification.create";
pub const NOTIFICATION_READ: &str = "notification.read";
pub const NOTIFICATION_UPDATE: &str = "notification.update";
pub const NOTIFICATION_DELETE: &str = "notification.delete";

/// Every permission known to the platform.
pub const ALL: &[&str] = &[
    USER_CREATE,
    USER_READ,
    USER_UPDATE,
    USER_DELETE,
    ORGANIZATION_CREATE,
    ORGANIZATION_READ,
    ORGANIZATION_UPDATE,
    ORGANIZATION_DELETE,
    DEVICE_CREATE,
    DEVICE_READ,
    DEVICE_UPDATE,
    DEVICE_DELETE,
    TELEMETRY_READ,
    TELEMETRY_SYNC,
    SUPPORT_CREATE,
    SUPPORT_READ,
    SUPPORT_UPDATE,
    SUPPORT_DELETE,
    NOTIFICATION_CREATE,
    NOTIFICATION_READ,
    NOTIFICATION_UPDATE,
    NOTIFICATION_DELETE,
];

/// Default grants per role, in the order roles are listed to users.
pub fn default_grants() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (ROLE_SUPER_ADMIN, ALL.to_vec()),
        (
            ROLE_ADMIN,
            vec![
                USER_CREATE,
                USER_READ,
                USER_UPDATE,
                USER_DELETE,
                ORGANIZATION_CREATE,
                ORGANIZATION_READ,
                ORGANIZATION_UPDATE,
                ORGANIZATION_DELETE,
                DEVICE_READ,
                TELEMETRY_READ,
                SUPPORT_READ,
                SUPPORT_UPDATE,
                NOTIFICATION_READ,
                NOTIFICATION_UPDATE,
            ],
        ),
        (
            ROLE_ORGANIZATION_ADMIN,
            vec![
                USER_CREATE,
                USER_READ,
                USER_UPDATE,
                ORGANIZATION_READ,
                ORGANIZATION_UPDATE,
                DEVICE_CREATE,
                DEVICE_READ,
                DEVICE_UPDATE,
                TELEMETRY_READ,
                SUPPORT_CREATE,
                SUPPORT_READ,
                SUPPORT_UPDATE,
                NOTIFICATION_READ,
                NOTIFICATION_UPDATE,
            ],
        ),
        (
            ROLE_TECHNICIAN,
            vec![
                DEVICE_READ,
                DEVICE_UPDATE,
                TELEMETRY_READ,
                TELEMETRY_SYNC,
                SUPPORT_CREATE,
                SUPPORT_READ,
                SUPPORT_UPDATE,
            ],
        ),
        (
            ROLE_SUPPORT,
            vec![
                USER_READ,
                ORGANIZATION_READ,
                DEVICE_READ,
                TELEMETRY_READ,
                SUPPORT_CREATE,
                SUPPORT_READ,
                SUPPORT_UPDATE,
            ],
        ),
        (
            ROLE_VIEWER,
            vec![
                USER_READ,
                ORGANIZATION_READ,
                DEVICE_READ,
                TELEMETRY_READ,
                SUPPORT_READ,
                NOTIFICATION_READ,
            ],
        ),
        (
            ROLE_CLIENT,
            vec![
                DEVICE_READ,
                TELEMETRY_READ,
                SUPPORT_CREATE,
                SUPPORT_READ,
                NOTIFICATION_READ,
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_holds_everything() {
        let grants = default_grants();
        let (_, perms) = grants.iter().find(|(r, _)| *r == ROLE_SUPER_ADMIN).unwrap();
        assert_eq!(perms.len(), ALL.len());
    }

    #[test]
    fn test_client_cannot_write_devices() {
        let grants = default_grants();
        let (_, perms) = grants.iter().find(|(r, _)| *r == ROLE_CLIENT).unwrap();
        assert!(perms.contains(&DEVICE_READ));
        assert!(!perms.contains(&DEVICE_UPDATE));
    }

    #[test]
    fn test_every_grant_is_known() {
        for (_, perms) in default_grants() {
            for p in perms {
                assert!(ALL.contains(&p), "unknown permission {p}");
                assert!(p.contains('.'));
            }
        }
    }
}
