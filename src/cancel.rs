/// Cancellation token for emulated playback.
///
/// `cancel()` and `run_unless_cancelled()` share one lock, so once `cancel()`
/// returns no further guarded step can run. Waiters parked in `cancelled()`
/// are woken through a watch channel.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    gate: Mutex<bool>,
    tx: watch::Sender<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner { gate: Mutex::new(false), tx }),
        }
    }

    /// Cancel. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.gate.lock().unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.inner.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` unless already cancelled. A concurrent `cancel()` waits for
    /// `f` to finish.
    pub fn run_unless_cancelled<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let cancelled = self.inner.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if *cancelled {
            return None;
        }
        let out = f();
        drop(cancelled);
        Some(out)
    }

    /// Resolves once the token is cancelled (immediately if it already is).
    pub async fn cancelled(&self) {
        let mut rx = self.inner.tx.subscribe();
        // The sender lives in `inner`, so this only errs if it was dropped.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, sleep};

    #[test]
    fn guarded_step_skipped_after_cancel() {
        let token = CancelToken::new();
        assert_eq!(token.run_unless_cancelled(|| 1), Some(1));
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.run_unless_cancelled(|| 2), None);
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wakes_a_parked_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = waiter.cancelled() => true,
                _ = sleep(Duration::from_secs(60)) => false,
            }
        });
        sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert!(task.await.unwrap());
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
