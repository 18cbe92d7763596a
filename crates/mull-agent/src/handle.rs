//! A cloneable handle for poking the orchestrator from external code.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// A cloneable handle for aborting and observing the in-flight turn.
///
/// All fields are `Arc`-wrapped, so cloning is cheap.
#[derive(Clone)]
pub struct TurnHandle {
    pub(crate) cancel: Arc<Mutex<CancellationToken>>,
    pub(crate) idle_notify: Arc<tokio::sync::Notify>,
    pub(crate) is_running: Arc<AtomicBool>,
}

impl TurnHandle {
    pub(crate) fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            idle_notify: Arc::new(tokio::sync::Notify::new()),
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Abort the current turn. No-op when idle.
    pub fn abort(&self) {
        self.cancel.lock().cancel();
    }

    /// Install a fresh token for a new turn and mark it running
    pub(crate) fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        self.is_running.store(true, Ordering::Release);
        token
    }

    /// Mark the turn finished and wake waiters
    pub(crate) fn finish(&self) {
        self.is_running.store(false, Ordering::Release);
        self.idle_notify.notify_waiters();
    }

    /// Wait until no turn is running.
    pub async fn wait_for_idle(&self) {
        let notified = self.idle_notify.notified();
        if !self.is_running.load(Ordering::Acquire) {
            return;
        }
        notified.await;
    }

    /// Wait until idle, with a timeout.
    /// Returns `true` if idle was reached, `false` on timeout.
    pub async fn wait_for_idle_timeout(&self, timeout: std::time::Duration) -> bool {
        if !self.is_running.load(Ordering::Acquire) {
            return true;
        }
        tokio::time::timeout(timeout, self.wait_for_idle())
            .await
            .is_ok()
    }

    /// Whether a turn is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_abort_cancels_current_token() {
        let handle = TurnHandle::new();
        let token = handle.begin();
        assert!(!token.is_cancelled());
        handle.abort();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_begin_replaces_cancelled_token() {
        let handle = TurnHandle::new();
        handle.begin();
        handle.abort();
        let fresh = handle.begin();
        assert!(!fresh.is_cancelled());
    }

    #[tokio::test]
    async fn test_wait_for_idle_when_not_running() {
        let handle = TurnHandle::new();
        assert!(handle.wait_for_idle_timeout(Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_wait_for_idle_wakes_on_finish() {
        let handle = TurnHandle::new();
        handle.begin();
        assert!(handle.is_running());

        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.wait_for_idle().await });
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.finish();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_wait_for_idle_timeout_expires() {
        let handle = TurnHandle::new();
        handle.begin();
        assert!(!handle.wait_for_idle_timeout(Duration::from_millis(20)).await);
    }
}
