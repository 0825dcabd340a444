//! Attach/detach signalling between the feed engine and its session task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// One-shot detach flag shared by the engine, its intent senders and the
/// session task.
#[derive(Clone, Default)]
pub struct DetachSignal {
    detached: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl DetachSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session detached and wake the session task.
    ///
    /// Returns `true` only for the call that actually detached.
    pub fn signal(&self) -> bool {
        if self.detached.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Resolve once `signal()` has been called.
    pub async fn wait(&self) {
        // Register with Notify before checking the flag, otherwise a signal
        // between the check and the await is lost.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_detached() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_is_one_shot() {
        let signal = DetachSignal::new();
        assert!(!signal.is_detached());
        assert!(signal.signal());
        assert!(!signal.signal());
        assert!(signal.is_detached());
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_detached() {
        let signal = DetachSignal::new();
        signal.signal();
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("wait should not block after detach");
    }

    #[tokio::test]
    async fn wait_wakes_on_signal() {
        let signal = DetachSignal::new();
        let waiter = signal.clone();
        let task = tokio::spawn(async move { waiter.wait().await });
        tokio::task::yield_now().await;
        signal.signal();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
