//! Revoked access tokens.
//!
//! Logout adds the token's `jti` here until the token would have expired
//! anyway; entries past their expiry are purged on the next write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct RevokedTokens {
    entries: Arc<Mutex<HashMap<String, usize>>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes `jti` until the unix timestamp `exp`.
    pub fn revoke(&self, jti: &str, exp: usize) {
        let now = now();
        let mut entries = self.lock();
        entries.retain(|_, until| *until > now);
        if exp > now {
            entries.insert(jti.to_string(), exp);
        }
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.lock().get(jti).is_some_and(|until| *until > now())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now() -> usize {
    Utc::now().timestamp() as usize
}
