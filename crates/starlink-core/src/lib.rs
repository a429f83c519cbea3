//! # Starlink Core
//!
//! Core types, errors, and utilities for the Starlink Platform API.
//!
//! - [`errors`]: [`AppError`] and the machine-readable [`ErrorCode`]
//! - [`response`]: the `{status, message, data}` JSON envelope
//! - [`password`]: bcrypt password hashing and verification
//! - [`permissions`]: role names and `resource.action` permission catalog

pub mod errors;
pub mod password;
pub mod permissions;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorCode};
pub use password::{hash_password, hash_password_with_cost, verify_password};
pub use response::{ApiResponse, ErrorBody, message_response, success_response};
