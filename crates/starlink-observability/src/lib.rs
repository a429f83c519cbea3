//! # Starlink Observability
//!
//! - [`logging`]: tracing subscriber setup and the HTTP request logging middleware
//! - [`metrics`]: Prometheus exporter, request metrics and authentication counters
//!
//! At runtime everything beyond console logging can be switched off with
//! `OBSERVABILITY_ENABLED=false`.
//!
//! # Example
//!
//! ```no_run
//! use starlink_observability::{init_basic_console_logging, init_tracing, is_observability_enabled};
//!
//! if is_observability_enabled() {
//!     init_tracing().expect("tracing");
//! } else {
//!     init_basic_console_logging();
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use crate::logging::{init_basic_console_logging, init_tracing, logging_middleware};
pub use crate::metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware,
    track_authorization_check, track_jwt_issued, track_jwt_validation, track_login_failure,
    track_login_success, track_token_refresh, track_user_registered,
};
