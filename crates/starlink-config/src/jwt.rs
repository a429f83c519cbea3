use std::env;

/// Signing secret and token lifetimes (seconds).
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub const DEFAULT_ACCESS_EXPIRY: i64 = 3600; // 1 hour
    pub const DEFAULT_REFRESH_EXPIRY: i64 = 2_592_000; // 30 days

    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "default_jwt_secret_key_change_in_production".to_string()),
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_ACCESS_EXPIRY),
            refresh_token_expiry: env::var("JWT_REFRESH_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_REFRESH_EXPIRY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        assert_eq!(JwtConfig::DEFAULT_ACCESS_EXPIRY, 3600);
        assert_eq!(JwtConfig::DEFAULT_REFRESH_EXPIRY, 30 * 24 * 3600);
    }
}
