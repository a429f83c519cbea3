//! Client-side session configuration.
//!
//! # Environment Variables
//!
//! - `STARLINK_API_URL`: API base URL including the `/api` prefix (default: `http://localhost:5000/api`)
//! - `SESSION_REFRESH_INTERVAL_SECS`: proactive refresh cadence (default: 900)
//! - `SESSION_REFRESH_WAIT_TIMEOUT_SECS`: how long a request waits for a coalesced refresh (default: 30)
//! - `SESSION_REQUEST_TIMEOUT_SECS`: per-request HTTP timeout (default: 30)
//! - `SESSION_TOKEN_FILE`: where tokens persist between runs (unset: memory only)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub api_base_url: String,
    pub refresh_interval: Duration,
    pub refresh_wait_timeout: Duration,
    pub request_timeout: Duration,
    pub token_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            refresh_interval: Duration::from_secs(15 * 60),
            refresh_wait_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            token_file: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("STARLINK_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            refresh_interval: secs_from_env("SESSION_REFRESH_INTERVAL_SECS")
                .unwrap_or(defaults.refresh_interval),
            refresh_wait_timeout: secs_from_env("SESSION_REFRESH_WAIT_TIMEOUT_SECS")
                .unwrap_or(defaults.refresh_wait_timeout),
            request_timeout: secs_from_env("SESSION_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            token_file: env::var("SESSION_TOKEN_FILE").ok().map(PathBuf::from),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    #[must_use]
    pub fn with_refresh_wait_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_wait_timeout = timeout;
        self
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
