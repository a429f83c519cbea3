#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use starlink_config::SessionConfig;
use starlink_models::{Credentials, LoginResponse, UserProfile};
use starlink_session::{
    MemoryTokenStore, SessionError, SessionEvent, SessionStore, TokenIssuer, TokenStore,
};
use tokio::sync::broadcast;

pub const PASSWORD: &str = "x";
const NO_VALID_TOKEN: usize = usize::MAX;

/// In-process issuer. Access tokens are `access-N`; only the most recently
/// issued one is accepted until [`FakeIssuer::expire_access`] is called.
pub struct FakeIssuer {
    user: UserProfile,
    issued: AtomicUsize,
    valid: AtomicUsize,
    refresh_delay: Duration,
    refresh_fails: AtomicBool,
    logout_fails: AtomicBool,
    reject_as_invalid: AtomicBool,
    distinct_logins: AtomicBool,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub protected_calls: AtomicUsize,
}

impl FakeIssuer {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            issued: AtomicUsize::new(0),
            valid: AtomicUsize::new(0),
            refresh_delay: Duration::ZERO,
            refresh_fails: AtomicBool::new(false),
            logout_fails: AtomicBool::new(false),
            reject_as_invalid: AtomicBool::new(false),
            distinct_logins: AtomicBool::new(false),
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            protected_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn failing_refresh(self) -> Self {
        self.refresh_fails.store(true, Ordering::SeqCst);
        self
    }

    /// Each login hands out its own refresh token, `refresh-<login count>`.
    pub fn with_distinct_logins(self) -> Self {
        self.distinct_logins.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_logout(self) -> Self {
        self.logout_fails.store(true, Ordering::SeqCst);
        self
    }

    /// The current access token now reads as expired.
    pub fn expire_access(&self) {
        self.valid.store(NO_VALID_TOKEN, Ordering::SeqCst);
    }

    /// Every token now reads as invalid (bad signature, revoked).
    pub fn reject_as_invalid(&self) {
        self.reject_as_invalid.store(true, Ordering::SeqCst);
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn check(&self, token: &str) -> Result<(), SessionError> {
        if self.reject_as_invalid.load(Ordering::SeqCst) {
            return Err(SessionError::TokenInvalid);
        }
        let valid = self.valid.load(Ordering::SeqCst);
        if valid != NO_VALID_TOKEN && token == format!("access-{valid}") {
            Ok(())
        } else {
            Err(SessionError::TokenExpired)
        }
    }

    fn refresh_token_for(&self, login: usize) -> String {
        if self.distinct_logins.load(Ordering::SeqCst) {
            format!("refresh-{login}")
        } else {
            "refresh-0".to_string()
        }
    }

    /// A protected endpoint: echoes the token it accepted.
    pub async fn protected(&self, token: &str) -> Result<String, SessionError> {
        self.protected_calls.fetch_add(1, Ordering::SeqCst);
        self.check(token).map(|()| token.to_string())
    }
}

#[async_trait]
impl TokenIssuer for FakeIssuer {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, SessionError> {
        let logins = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if credentials.secret != PASSWORD {
            return Err(SessionError::InvalidCredentials(
                "Invalid email or password".to_string(),
            ));
        }
        let n = self.issued.load(Ordering::SeqCst);
        self.valid.store(n, Ordering::SeqCst);
        Ok(LoginResponse {
            user: self.user.clone(),
            access_token: format!("access-{n}"),
            refresh_token: self.refresh_token_for(logins),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        let known = refresh_token == "refresh-0"
            || (self.distinct_logins.load(Ordering::SeqCst) && refresh_token.starts_with("refresh-"));
        if self.refresh_fails.load(Ordering::SeqCst) || !known {
            return Err(SessionError::Api {
                status: 401,
                message: "Invalid or expired refresh token".to_string(),
            });
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.valid.store(n, Ordering::SeqCst);
        Ok(format!("access-{n}"))
    }

    async fn me(&self, access_token: &str) -> Result<UserProfile, SessionError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.check(access_token).map(|()| self.user.clone())
    }

    async fn logout(&self, _access_token: &str) -> Result<(), SessionError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(SessionError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

/// `{"email": "a@b.com", "roles": [{"name": ...}], "permissions": [...]}`
pub fn user(roles: &[&str], permissions: &[&str]) -> UserProfile {
    let json = serde_json::json!({
        "id": uuid::Uuid::new_v4(),
        "email": "a@b.com",
        "first_name": "Ada",
        "roles": roles.iter().map(|r| serde_json::json!({ "name": r })).collect::<Vec<_>>(),
        "permissions": permissions
            .iter()
            .map(|p| {
                let (resource, action) = p.split_once('.').unwrap();
                serde_json::json!({ "resource": resource, "action": action })
            })
            .collect::<Vec<_>>(),
    });
    serde_json::from_value(json).unwrap()
}

pub fn config() -> SessionConfig {
    SessionConfig::default().with_base_url("http://issuer.test/api")
}

pub struct Harness {
    pub issuer: Arc<FakeIssuer>,
    pub storage: Arc<MemoryTokenStore>,
    pub store: SessionStore,
}

impl Harness {
    pub fn new(issuer: FakeIssuer) -> Self {
        Self::with_storage(issuer, MemoryTokenStore::new())
    }

    pub fn with_storage(issuer: FakeIssuer, storage: MemoryTokenStore) -> Self {
        Self::with_parts(issuer, storage, config())
    }

    pub fn with_config(issuer: FakeIssuer, config: SessionConfig) -> Self {
        Self::with_parts(issuer, MemoryTokenStore::new(), config)
    }

    fn with_parts(issuer: FakeIssuer, storage: MemoryTokenStore, config: SessionConfig) -> Self {
        let issuer = Arc::new(issuer);
        let storage = Arc::new(storage);
        let store = SessionStore::new(issuer.clone(), storage.clone(), config);
        Self {
            issuer,
            storage,
            store,
        }
    }

    pub async fn login(&self) {
        self.store
            .login(&Credentials::new("a@b.com", PASSWORD))
            .await
            .unwrap();
    }

    /// Runs a protected call through the store.
    pub async fn call(&self) -> Result<String, SessionError> {
        call(&self.store, &self.issuer).await
    }

    pub async fn stored_tokens(&self) -> Option<starlink_models::TokenPair> {
        self.storage.load().await.unwrap()
    }
}

pub async fn call(store: &SessionStore, issuer: &Arc<FakeIssuer>) -> Result<String, SessionError> {
    let issuer = Arc::clone(issuer);
    store
        .send(move |token| {
            let issuer = Arc::clone(&issuer);
            async move { issuer.protected(&token).await }
        })
        .await
}

/// Lets spawned tasks run to completion at the current instant.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}
