//! # Starlink Platform API
//!
//! Authentication and session service for the Starlink Platform, built with
//! Axum. The server issues and verifies JWTs; the companion
//! `starlink-session` crate keeps a client's session alive against it.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # AuthUser extractor, role and permission checks
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login, refresh, me, logout, register, change-password
//! │   └── users/       # User records, role catalog, repository, seeding
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Main application router
//! ├── state.rs          # Shared application state
//! └── validator.rs      # ValidatedJson extractor
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models
//! - `router.rs`: Axum router configuration
//!
//! ## Authentication
//!
//! - **Access Token**: short-lived (default: 1 hour), carries role and
//!   permission names
//! - **Refresh Token**: long-lived (default: 30 days), exchanged at
//!   `/api/auth/refresh` for a new access token; never rotated
//!
//! Every 401 carries a `code`: `token_expired` (the only one a client should
//! refresh on), `token_invalid`, `token_missing` or `invalid_credentials`.
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! INIT_DB=true                       # seeds admin@example.com / adminpassword
//! USERS_SEED_FILE=storage/seed/users.json
//! PORT=5000
//! ```
//!
//! The OpenAPI document is served at `/api-docs/openapi.json` and
//! Prometheus metrics at `/metrics` unless `OBSERVABILITY_ENABLED=false`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use starlink_auth;
pub use starlink_config;
pub use starlink_core;
pub use starlink_models;
