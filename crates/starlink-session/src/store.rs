//! The session store: one explicitly constructed object owning the token
//! pair and the user profile for the lifetime of a login.
//!
//! # Lifecycle
//!
//! ```text
//! Loading --initialize--> Authenticated | Unauthenticated
//! Unauthenticated --login--> Authenticated
//! Authenticated --refresh--> Authenticated
//! Authenticated --logout | failed refresh--> Unauthenticated
//! ```
//!
//! Only this module and the [`RefreshCoordinator`] it drives mutate the
//! token pair. State changes go through the `watch` sender, which
//! serializes writers; storage is kept in sync with whatever the state
//! holds after each change.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starlink_session::{HttpIssuer, MemoryTokenStore, SessionStore};
//!
//! let issuer = Arc::new(HttpIssuer::new(&config)?);
//! let store = SessionStore::new(issuer, Arc::new(MemoryTokenStore::new()), config);
//! store.initialize().await;
//! store.login(&Credentials::new("a@b.com", "secret")).await?;
//! assert!(store.has_role("Client"));
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use starlink_config::SessionConfig;
use starlink_models::{Credentials, UserProfile};

use crate::coordinator::{RefreshCoordinator, Ticket};
use crate::error::SessionError;
use crate::issuer::TokenIssuer;
use crate::session::{Session, SessionEvent, SessionStatus};
use crate::storage::TokenStore;
use crate::timer::RefreshTimer;

const EVENT_CAPACITY: usize = 16;

/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

/// Handle held by the refresh timer so it never keeps the session alive.
#[derive(Clone)]
pub(crate) struct WeakSessionStore(Weak<Inner>);

impl WeakSessionStore {
    pub(crate) fn upgrade(&self) -> Option<SessionStore> {
        self.0.upgrade().map(|inner| SessionStore { inner })
    }
}

struct Inner {
    issuer: Arc<dyn TokenIssuer>,
    storage: Arc<dyn TokenStore>,
    config: SessionConfig,
    state: watch::Sender<Session>,
    events: broadcast::Sender<SessionEvent>,
    coordinator: RefreshCoordinator,
    /// Serializes storage writes so they land in state order.
    persist_lock: tokio::sync::Mutex<()>,
    timer: Mutex<Option<RefreshTimer>>,
}

impl SessionStore {
    pub fn new(
        issuer: Arc<dyn TokenIssuer>,
        storage: Arc<dyn TokenStore>,
        config: SessionConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                issuer,
                storage,
                config,
                state: watch::Sender::new(Session::loading()),
                events,
                coordinator: RefreshCoordinator::new(),
                persist_lock: tokio::sync::Mutex::new(()),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Restores a session from stored tokens.
    ///
    /// An expired access token goes through the normal refresh path. Any
    /// other failure clears storage and leaves the session unauthenticated.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> SessionStatus {
        let stored = match self.inner.storage.load().await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                debug!("no stored session");
                self.inner.state.send_replace(Session::unauthenticated(None));
                return SessionStatus::Unauthenticated;
            }
            Err(e) => {
                warn!(error = %e, "failed to load stored tokens");
                self.inner.state.send_replace(Session::unauthenticated(None));
                self.inner.persist().await;
                return SessionStatus::Unauthenticated;
            }
        };

        self.inner.state.send_replace(Session {
            tokens: Some(stored),
            ..Session::loading()
        });

        let issuer = Arc::clone(&self.inner.issuer);
        let result = self
            .send(|token| {
                let issuer = Arc::clone(&issuer);
                async move { issuer.me(&token).await }
            })
            .await;

        match result {
            Ok(user) => {
                let user = Arc::new(user);
                let restored = self.inner.state.send_if_modified(|s| {
                    if s.tokens.is_none() {
                        return false;
                    }
                    s.status = SessionStatus::Authenticated;
                    s.user = Some(Arc::clone(&user));
                    true
                });
                if !restored {
                    return SessionStatus::Unauthenticated;
                }
                self.inner.arm_timer();
                info!(user = %user.email, "session restored");
                SessionStatus::Authenticated
            }
            Err(e) => {
                info!(error = %e, "stored session rejected");
                self.inner.state.send_modify(|s| {
                    s.status = SessionStatus::Unauthenticated;
                    s.user = None;
                    s.tokens = None;
                });
                self.inner.persist().await;
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Logs in. On failure the session is left as it was, apart from the
    /// error message recorded on the snapshot.
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Arc<UserProfile>, SessionError> {
        let response = match self.inner.issuer.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "login failed");
                self.inner.state.send_modify(|s| s.error = Some(message));
                return Err(e);
            }
        };

        let tokens = response.tokens();
        let user = Arc::new(response.user);
        self.inner
            .state
            .send_replace(Session::authenticated(Arc::clone(&user), tokens));
        self.inner.persist().await;
        self.inner.arm_timer();
        let _ = self.inner.events.send(SessionEvent::LoggedIn);

        info!(user = %user.email, roles = user.roles.len(), "logged in");
        Ok(user)
    }

    /// Ends the session locally, then tells the issuer. Issuer errors are
    /// ignored.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.inner.disarm_timer();
        let previous = self
            .inner
            .state
            .send_replace(Session::unauthenticated(None));
        self.inner.persist().await;
        let _ = self.inner.events.send(SessionEvent::LoggedOut);

        if let Some(tokens) = previous.tokens {
            if let Err(e) = self.inner.issuer.logout(&tokens.access_token).await {
                debug!(error = %e, "issuer logout failed");
            }
        }
        info!("logged out");
    }

    /// Runs a protected call with the current access token.
    ///
    /// If the call fails with [`SessionError::TokenExpired`] the token is
    /// refreshed (coalesced with any refresh already running) and the call
    /// is retried once with the new token. Other errors are returned as-is.
    pub async fn send<T, F, Fut>(&self, mut request: F) -> Result<T, SessionError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, SessionError>>,
    {
        let token = self.access_token().ok_or(SessionError::TokenMissing)?;

        match request(token.clone()).await {
            Err(SessionError::TokenExpired) => {
                debug!("access token expired, refreshing");
                let fresh = self.refreshed_token(Some(&token)).await?;
                request(fresh).await
            }
            result => result,
        }
    }

    /// Refreshes the access token now, joining a refresh already in flight.
    pub async fn refresh_now(&self) -> Result<String, SessionError> {
        self.refreshed_token(None).await
    }

    /// Stops the refresh timer without touching the session.
    pub fn shutdown(&self) {
        self.inner.disarm_timer();
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().status
    }

    pub fn user(&self) -> Option<Arc<UserProfile>> {
        self.inner.state.borrow().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.state.borrow().access_token().map(str::to_owned)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.inner.state.borrow().has_role(name)
    }

    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.inner.state.borrow().has_permission(resource, action)
    }

    pub fn has_active_timer(&self) -> bool {
        self.inner
            .lock_timer()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Snapshot stream; the receiver sees the latest state on every change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Returns a token newer than `stale`, refreshing if needed. With
    /// `stale = None` a refresh always happens.
    async fn refreshed_token(&self, stale: Option<&str>) -> Result<String, SessionError> {
        let has_session = self.inner.state.borrow().tokens.is_some();
        if !has_session {
            return Err(SessionError::RefreshFailed);
        }

        let state = &self.inner.state;
        let ticket = self
            .inner
            .coordinator
            .join(|| {
                let current = state.borrow().access_token().map(str::to_owned)?;
                match stale {
                    Some(stale) if stale != current => Some(current),
                    _ => None,
                }
            })
            .await;

        let receiver = match ticket {
            Ticket::Ready(token) => return Ok(token),
            Ticket::Leader(receiver) => {
                tokio::spawn(Arc::clone(&self.inner).exchange());
                receiver
            }
            Ticket::Waiter(receiver) => receiver,
        };

        match tokio::time::timeout(self.inner.config.refresh_wait_timeout, receiver).await {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(_)) => Err(SessionError::RefreshFailed),
            Err(_) => {
                warn!(
                    timeout = ?self.inner.config.refresh_wait_timeout,
                    "gave up waiting for session refresh"
                );
                Err(SessionError::Timeout)
            }
        }
    }
}

impl Inner {
    /// The refresh exchange. Runs detached from the request that started it
    /// so cancelling that request cannot leave the coordinator stuck.
    ///
    /// Requests queued on this cycle may belong to a session that replaced
    /// the one the exchange started with (logout then login). When the
    /// stored refresh token changes mid-exchange the exchange is repeated
    /// with the current one, so the cycle always ends with a token for the
    /// session that is live when it completes.
    async fn exchange(self: Arc<Self>) {
        let mut outcome = None;

        while let Some(refresh_token) = self.current_refresh_token() {
            match self.issuer.refresh(&refresh_token).await {
                Ok(access_token) => {
                    if self.apply_refresh(&refresh_token, &access_token).await {
                        outcome = Some(access_token);
                        break;
                    }
                    debug!("session changed during refresh, retrying with current refresh token");
                }
                Err(e) => {
                    if self.current_refresh_token().as_deref() != Some(refresh_token.as_str()) {
                        debug!(error = %e, "refresh for a replaced session failed, retrying");
                        continue;
                    }
                    warn!(error = %e, "token refresh failed, ending session");
                    self.terminate(e.to_string()).await;
                    break;
                }
            }
        }

        self.coordinator.complete(outcome.as_deref()).await;
    }

    fn current_refresh_token(&self) -> Option<String> {
        self.state.borrow().refresh_token().map(str::to_owned)
    }

    /// Stores the new access token if the session still holds the refresh
    /// token the exchange used.
    async fn apply_refresh(&self, refresh_token: &str, access_token: &str) -> bool {
        let applied = self.state.send_if_modified(|s| match s.tokens.as_mut() {
            Some(tokens) if tokens.refresh_token == refresh_token => {
                tokens.access_token = access_token.to_string();
                true
            }
            _ => false,
        });

        if applied {
            self.persist().await;
            let _ = self.events.send(SessionEvent::Refreshed);
            debug!("session refreshed");
        }
        applied
    }

    /// Ends the session after an unrecoverable failure. Only the first call
    /// for a given session has any effect.
    async fn terminate(&self, reason: String) {
        let mut was_authenticated = false;
        let ended = self.state.send_if_modified(|s| {
            if s.tokens.is_none() && s.user.is_none() {
                return false;
            }
            was_authenticated = s.status == SessionStatus::Authenticated;
            *s = Session::unauthenticated(Some(reason.clone()));
            true
        });
        if !ended {
            return;
        }

        self.disarm_timer();
        self.persist().await;
        if was_authenticated {
            info!(reason = %reason, "session terminated");
            let _ = self.events.send(SessionEvent::Terminated { reason });
        }
    }

    /// Makes storage match the tokens the session currently holds.
    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let tokens = self.state.borrow().tokens.clone();
        let result = match tokens {
            Some(tokens) => self.storage.save(&tokens).await,
            None => self.storage.clear().await,
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist session tokens");
        }
    }

    fn arm_timer(self: &Arc<Self>) {
        let store = WeakSessionStore(Arc::downgrade(self));
        let timer = RefreshTimer::start(store, self.config.refresh_interval);
        let previous = self.lock_timer().replace(timer);
        drop(previous);
    }

    fn disarm_timer(&self) {
        let timer = self.lock_timer().take();
        drop(timer);
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<RefreshTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
