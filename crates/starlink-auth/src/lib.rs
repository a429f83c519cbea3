//! # Starlink Auth
//!
//! JWT issuance and verification for the Starlink Platform API.
//!
//! - [`claims`]: access and refresh token claims
//! - [`jwt`]: token creation, verification and failure classification
//!
//! Only [`TokenRejection::Expired`] should ever lead a client to attempt a
//! refresh; missing and invalid tokens are terminal for the request.

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, RefreshClaims, TokenKind};
pub use jwt::{
    TokenRejection, create_access_token, create_refresh_token, extract_bearer,
    verify_access_token, verify_refresh_token,
};
