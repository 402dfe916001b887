use crate::sync::lock;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cooperative stop flag shared by every thread of one simulation.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken {
            cancelled: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn cancel(&self) {
        let (cancelled, wakeup) = &*self.cancelled;

        *lock(cancelled) = true;

        wakeup.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *lock(&self.cancelled.0)
    }

    /// Sleeps for `duration` unless cancelled first. Returns whether the
    /// token is cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (cancelled, wakeup) = &*self.cancelled;

        let (cancelled, _) = wakeup
            .wait_timeout_while(lock(cancelled), duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);

        *cancelled
    }
}

impl Default for CancellationToken {
    fn default() -> CancellationToken {
        CancellationToken::new()
    }
}
