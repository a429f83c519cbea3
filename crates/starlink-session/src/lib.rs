//! # Starlink Session
//!
//! Client-side session lifecycle for the Starlink Platform API.
//!
//! - [`issuer`]: the [`TokenIssuer`] contract and its HTTP implementation
//! - [`storage`]: where the token pair lives between runs
//! - [`coordinator`]: single-flight refresh with FIFO waiters
//! - [`store`]: the [`SessionStore`] (login, logout, initialize, queries)
//! - [`timer`]: proactive refresh every `refresh_interval`
//! - [`guard`]: route access decisions over a session snapshot
//! - [`client`]: bearer-authenticated requests with transparent refresh
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starlink_config::SessionConfig;
//! use starlink_models::Credentials;
//! use starlink_session::{ApiClient, HttpIssuer, MemoryTokenStore, SessionStore};
//!
//! let config = SessionConfig::from_env();
//! let issuer = HttpIssuer::new(&config)?;
//! let store = SessionStore::new(
//!     Arc::new(issuer.clone()),
//!     Arc::new(MemoryTokenStore::new()),
//!     config,
//! );
//!
//! store.login(&Credentials::new("admin@example.com", "adminpassword")).await?;
//! let api = ApiClient::from_issuer(&issuer, store.clone());
//! let me: serde_json::Value = api.get("/auth/me").await?;
//! ```

pub mod client;
pub mod coordinator;
pub mod error;
pub mod guard;
mod http;
pub mod issuer;
pub mod session;
pub mod storage;
pub mod store;
pub mod timer;

pub use client::ApiClient;
pub use coordinator::{RefreshCoordinator, Ticket};
pub use error::SessionError;
pub use guard::{AuthGuard, GuardDecision, Requirement};
pub use http::classify_error;
pub use issuer::{HttpIssuer, TokenIssuer};
pub use session::{Session, SessionEvent, SessionStatus};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::SessionStore;
pub use timer::RefreshTimer;
