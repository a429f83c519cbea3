//! Token issuance and verification.
//!
//! Verification never tolerates clock skew: an access token is rejected the
//! moment its `exp` passes. Failures are classified into a
//! [`TokenRejection`] so the HTTP layer can tell clients whether a refresh
//! is worth attempting.
//!
//! # Example
//!
//! ```ignore
//! use starlink_auth::{create_access_token, verify_access_token};
//! use starlink_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(
//!     user_id,
//!     "tech@example.com",
//!     vec!["Technician".to_string()],
//!     vec!["device.read".to_string()],
//!     &config,
//! )?;
//!
//! let claims = verify_access_token(&token, &config)?;
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use starlink_config::JwtConfig;
use starlink_core::AppError;

use crate::claims::{AccessClaims, RefreshClaims, TokenKind};

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No `Authorization: Bearer` header.
    Missing,
    /// Well-formed and correctly signed, but past `exp`.
    Expired,
    /// Bad signature, malformed, wrong kind, or revoked.
    Invalid,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Missing => "missing",
            TokenRejection::Expired => "expired",
            TokenRejection::Invalid => "invalid",
        }
    }

    /// The 401 response for this rejection.
    pub fn into_app_error(self) -> AppError {
        match self {
            TokenRejection::Missing => AppError::token_missing(),
            TokenRejection::Expired => AppError::token_expired(),
            TokenRejection::Invalid => AppError::token_invalid(),
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pulls the token out of an `Authorization` header value. Anything other
/// than a non-empty `Bearer` credential counts as missing. The scheme name
/// is matched case-insensitively.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, TokenRejection> {
    header
        .map(str::trim_start)
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(TokenRejection::Missing)
}

/// Creates an access token carrying the user's role and permission names.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    roles: Vec<String>,
    permissions: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config.access_token_expiry);

    let claims = AccessClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        roles,
        permissions,
        typ: TokenKind::Access,
        jti: Uuid::new_v4().to_string(),
        iat,
        exp,
    };

    sign(&claims, jwt_config)
}

pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config.refresh_token_expiry);

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        typ: TokenKind::Refresh,
        jti: Uuid::new_v4().to_string(),
        iat,
        exp,
    };

    sign(&claims, jwt_config)
}

/// Verifies an access token and returns its claims.
///
/// A refresh token presented here is [`TokenRejection::Invalid`].
pub fn verify_access_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<AccessClaims, TokenRejection> {
    let claims: AccessClaims = decode_claims(token, jwt_config)?;
    if claims.typ != TokenKind::Access {
        return Err(TokenRejection::Invalid);
    }
    Ok(claims)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, TokenRejection> {
    let claims: RefreshClaims = decode_claims(token, jwt_config)?;
    if claims.typ != TokenKind::Refresh {
        return Err(TokenRejection::Invalid);
    }
    Ok(claims)
}

fn lifetime(expiry_secs: i64) -> (usize, usize) {
    let now = Utc::now().timestamp();
    (now as usize, (now + expiry_secs) as usize)
}

fn sign<T: Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

fn decode_claims<T: DeserializeOwned>(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<T, TokenRejection> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 86400,
        }
    }

    fn expired_access_token(config: &JwtConfig) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            email: "a@b.com".to_string(),
            roles: vec![],
            permissions: vec![],
            typ: TokenKind::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now - 120,
            exp: now - 60,
        };
        sign(&claims, config).unwrap()
    }

    #[test]
    fn test_access_token_roundtrip_claims() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = create_access_token(
            user_id,
            "a@b.com",
            vec!["Client".to_string()],
            vec!["device.read".to_string()],
            &config,
        )
        .unwrap();

        let claims = verify_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.typ, TokenKind::Access);
        assert!(claims.has_role("Client"));
        assert!(claims.has_permission("device.read"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_classified_expired() {
        let config = config();
        let token = expired_access_token(&config);
        assert_eq!(
            verify_access_token(&token, &config).unwrap_err(),
            TokenRejection::Expired
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_access_token(Uuid::new_v4(), "a@b.com", vec![], vec![], &config())
            .unwrap();
        let other = JwtConfig {
            secret: "another".to_string(),
            ..config()
        };
        assert_eq!(
            verify_access_token(&token, &other).unwrap_err(),
            TokenRejection::Invalid
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            verify_access_token("not.a.jwt", &config()).unwrap_err(),
            TokenRejection::Invalid
        );
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = config();
        let refresh = create_refresh_token(Uuid::new_v4(), "a@b.com", &config).unwrap();
        assert_eq!(
            verify_access_token(&refresh, &config).unwrap_err(),
            TokenRejection::Invalid
        );
        assert!(verify_refresh_token(&refresh, &config).is_ok());
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = config();
        let access = create_access_token(Uuid::new_v4(), "a@b.com", vec![], vec![], &config)
            .unwrap();
        assert_eq!(
            verify_refresh_token(&access, &config).unwrap_err(),
            TokenRejection::Invalid
        );
    }

    #[test]
    fn test_tokens_have_unique_jti() {
        let config = config();
        let user_id = Uuid::new_v4();
        let a = create_refresh_token(user_id, "a@b.com", &config).unwrap();
        let b = create_refresh_token(user_id, "a@b.com", &config).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(None), Err(TokenRejection::Missing));
        assert_eq!(extract_bearer(Some("Basic abc")), Err(TokenRejection::Missing));
        assert_eq!(extract_bearer(Some("Bearer ")), Err(TokenRejection::Missing));
    }

    #[test]
    fn test_extract_bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer(Some("bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(Some("BEARER abc")), Ok("abc"));
        assert_eq!(extract_bearer(Some("Bearerabc")), Err(TokenRejection::Missing));
    }

    #[test]
    fn test_rejection_maps_to_error_codes() {
        use starlink_core::ErrorCode;
        assert_eq!(
            TokenRejection::Expired.into_app_error().code,
            Some(ErrorCode::TokenExpired)
        );
        assert_eq!(
            TokenRejection::Invalid.into_app_error().code,
            Some(ErrorCode::TokenInvalid)
        );
        assert_eq!(
            TokenRejection::Missing.into_app_error().code,
            Some(ErrorCode::TokenMissing)
        );
    }
}
