//! # Starlink Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: limiter for authentication endpoints
//! - [`session`]: client-side session settings (base URL, refresh cadence)
//!
//! # Example
//!
//! ```ignore
//! use starlink_config::{JwtConfig, SessionConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod session;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{AuthGovernorConfig, RateLimitConfig};
pub use session::SessionConfig;
