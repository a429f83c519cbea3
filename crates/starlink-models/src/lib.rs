//! Domain models and DTOs for the Starlink Platform API.
//!
//! Types in this crate travel over the wire between the server and the
//! session client; both sides depend on the same definitions.

pub mod auth;
pub mod users;

pub use auth::{
    ChangePasswordRequest, Credentials, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, TokenPair,
};
pub use users::{ParsePermissionError, Permission, Role, SeedUser, UserProfile};
