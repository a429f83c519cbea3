use axum::http::StatusCode;
use starlink::middleware::auth::AuthUser;
use starlink::middleware::role::{
    ADMIN_ROLES, STAFF_ROLES, check_any_role, check_permission, check_role,
};
use starlink_auth::{AccessClaims, TokenKind};
use starlink_core::ErrorCode;
use starlink_core::permissions::{
    DEVICE_DELETE, DEVICE_READ, ROLE_ADMIN, ROLE_CLIENT, ROLE_SUPER_ADMIN, ROLE_TECHNICIAN,
};
use uuid::Uuid;

fn auth_user(roles: &[&str], permissions: &[&str]) -> AuthUser {
    AuthUser(AccessClaims {
        sub: Uuid::new_v4().to_string(),
        email: "user@example.com".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        typ: TokenKind::Access,
        jti: Uuid::new_v4().to_string(),
        iat: 1_700_000_000,
        exp: 9_999_999_999,
    })
}

#[test]
fn test_check_role() {
    let admin = auth_user(&[ROLE_ADMIN], &[]);
    assert!(check_role(&admin, ROLE_ADMIN).is_ok());

    let err = check_role(&admin, ROLE_SUPER_ADMIN).unwrap_err();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.code, Some(ErrorCode::InsufficientPermissions));
}

#[test]
fn test_check_any_role() {
    let tech = auth_user(&[ROLE_TECHNICIAN], &[]);
    assert!(check_any_role(&tech, STAFF_ROLES).is_ok());
    assert!(check_any_role(&tech, ADMIN_ROLES).is_err());

    let client = auth_user(&[ROLE_CLIENT], &[]);
    assert!(check_any_role(&client, STAFF_ROLES).is_err());
}

#[test]
fn test_empty_role_list_denies() {
    let super_admin = auth_user(&[ROLE_SUPER_ADMIN], &[]);
    assert!(check_any_role(&super_admin, &[]).is_err());
}

#[test]
fn test_user_without_roles_is_denied_everywhere() {
    let nobody = auth_user(&[], &[]);
    assert!(check_role(&nobody, ROLE_CLIENT).is_err());
    assert!(check_any_role(&nobody, STAFF_ROLES).is_err());
    assert!(check_permission(&nobody, DEVICE_READ).is_err());
}

#[test]
fn test_check_permission() {
    let client = auth_user(&[ROLE_CLIENT], &[DEVICE_READ]);
    assert!(check_permission(&client, DEVICE_READ).is_ok());

    let err = check_permission(&client, DEVICE_DELETE).unwrap_err();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
}

#[test]
fn test_auth_user_id_parses_subject() {
    let user = auth_user(&[], &[]);
    assert!(user.user_id().is_ok());

    let mut broken = auth_user(&[], &[]);
    broken.0.sub = "not-a-uuid".to_string();
    let err = broken.user_id().unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}
