//! Single-flight coalescing of refresh exchanges.
//!
//! The first request to find its access token expired becomes the leader
//! and starts the exchange; requests arriving while it runs queue behind it.
//! When the exchange finishes every queued request, the leader first, is
//! handed the new token in arrival order. When it fails the queue is
//! dropped and each receiver observes a closed channel.
//!
//! The flag check-and-set, the queue append and the "is there already a
//! newer token" check all happen under one lock, and [`complete`] is only
//! called after the new token is visible to that check. A request that
//! loses the race against a finished refresh therefore retries with the
//! stored token instead of starting a second exchange.
//!
//! [`complete`]: RefreshCoordinator::complete

use tokio::sync::{Mutex, oneshot};
use tracing::debug;

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<String>>,
}

/// What a request should do after its token was rejected as expired.
#[derive(Debug)]
pub enum Ticket {
    /// A newer token than the rejected one is already stored.
    Ready(String),
    /// No refresh was running; the caller must start the exchange, then
    /// wait on the receiver like everyone else.
    Leader(oneshot::Receiver<String>),
    /// A refresh is running; wait for its result.
    Waiter(oneshot::Receiver<String>),
}

#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the current refresh cycle, starting one if none is running.
    ///
    /// `newer_token` runs under the lock and should return the stored
    /// access token when it differs from the one the request used.
    pub async fn join<F>(&self, newer_token: F) -> Ticket
    where
        F: FnOnce() -> Option<String>,
    {
        let mut state = self.state.lock().await;

        if !state.refreshing {
            if let Some(token) = newer_token() {
                return Ticket::Ready(token);
            }
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push(tx);

        if state.refreshing {
            debug!(waiting = state.waiters.len(), "queued behind in-flight refresh");
            Ticket::Waiter(rx)
        } else {
            state.refreshing = true;
            Ticket::Leader(rx)
        }
    }

    /// Ends the current cycle. `Some(token)` is delivered to every waiter in
    /// FIFO order; `None` drops them all.
    pub async fn complete(&self, outcome: Option<&str>) {
        let waiters = {
            let mut state = self.state.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        match outcome {
            Some(token) => {
                debug!(waiters = waiters.len(), "delivering refreshed token");
                for waiter in waiters {
                    // A waiter that timed out has dropped its receiver.
                    let _ = waiter.send(token.to_string());
                }
            }
            None => {
                debug!(waiters = waiters.len(), "refresh failed, releasing waiters");
                drop(waiters);
            }
        }
    }

    pub async fn is_refreshing(&self) -> bool {
        self.state.lock().await.refreshing
    }

    /// Number of requests waiting on the current cycle, leader included.
    pub async fn pending(&self) -> usize {
        self.state.lock().await.waiters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_joiner_leads_rest_wait() {
        let coordinator = RefreshCoordinator::new();

        let first = coordinator.join(|| None).await;
        let second = coordinator.join(|| None).await;
        let third = coordinator.join(|| None).await;

        assert!(matches!(first, Ticket::Leader(_)));
        assert!(matches!(second, Ticket::Waiter(_)));
        assert!(matches!(third, Ticket::Waiter(_)));
        assert!(coordinator.is_refreshing().await);
        assert_eq!(coordinator.pending().await, 3);
    }

    #[tokio::test]
    async fn test_success_delivers_token_to_all() {
        let coordinator = RefreshCoordinator::new();

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match coordinator.join(|| None).await {
                Ticket::Leader(rx) | Ticket::Waiter(rx) => receivers.push(rx),
                Ticket::Ready(_) => panic!("unexpected ready ticket"),
            }
        }

        coordinator.complete(Some("new-token")).await;

        for rx in receivers {
            assert_eq!(rx.await.unwrap(), "new-token");
        }
        assert!(!coordinator.is_refreshing().await);
        assert_eq!(coordinator.pending().await, 0);
    }

    #[tokio::test]
    async fn test_failure_closes_every_waiter() {
        let coordinator = RefreshCoordinator::new();

        let Ticket::Leader(leader) = coordinator.join(|| None).await else {
            panic!("expected leader");
        };
        let Ticket::Waiter(waiter) = coordinator.join(|| None).await else {
            panic!("expected waiter");
        };

        coordinator.complete(None).await;

        assert!(leader.await.is_err());
        assert!(waiter.await.is_err());
        assert!(!coordinator.is_refreshing().await);
    }

    #[tokio::test]
    async fn test_newer_token_short_circuits_when_idle() {
        let coordinator = RefreshCoordinator::new();

        let ticket = coordinator.join(|| Some("already-fresh".to_string())).await;

        assert!(matches!(ticket, Ticket::Ready(ref t) if t == "already-fresh"));
        assert!(!coordinator.is_refreshing().await);
    }

    #[tokio::test]
    async fn test_newer_token_ignored_while_refreshing() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.join(|| None).await;

        let ticket = coordinator.join(|| Some("stale-view".to_string())).await;

        assert!(matches!(ticket, Ticket::Waiter(_)));
    }

    #[tokio::test]
    async fn test_new_cycle_after_completion() {
        let coordinator = RefreshCoordinator::new();
        let _ = coordinator.join(|| None).await;
        coordinator.complete(Some("t1")).await;

        assert!(matches!(coordinator.join(|| None).await, Ticket::Leader(_)));
    }
}
