//! Proactive refresh on a fixed cadence.
//!
//! The timer refreshes through the same coordinator as expired requests,
//! so a tick that lands during a reactive refresh just waits for it. A
//! failed refresh has already terminated the session by the time the tick
//! sees the error, so the loop simply stops.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::store::WeakSessionStore;

/// A running refresh loop. Dropping it cancels the loop.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub(crate) fn start(store: WeakSessionStore, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };

                debug!("periodic session refresh");
                match store.refresh_now().await {
                    Ok(_) => {}
                    Err(SessionError::Timeout) => {
                        warn!("periodic refresh still pending, retrying next tick");
                    }
                    Err(e) => {
                        warn!(error = %e, "periodic refresh failed, stopping timer");
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
