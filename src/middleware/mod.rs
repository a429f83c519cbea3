//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor and permission extractors
//! - [`role`]: role checks, role-gated middleware and extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` verifies the access token and rejects revoked ones
//! 3. Role middleware or permission extractors check the claims
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireUserRead};
//!
//! async fn get_profile(auth_user: AuthUser) -> impl IntoResponse {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//!
//! async fn list_users(RequireUserRead(auth_user): RequireUserRead) -> impl IntoResponse {
//!     // Only executes if the token carries "user.read"
//! }
//! ```

pub mod auth;
pub mod role;
