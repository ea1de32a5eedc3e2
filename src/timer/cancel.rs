use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation flag shared between a task and its owner.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl CancelToken {
    /// Create a token that is not yet cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Cancel the token. Only the first call wakes waiters.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether `cancel` has been called on this token or a clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        // Register before checking the flag, otherwise a cancel landing in
        // between would notify nobody.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts tasks that are currently alive.
#[derive(Clone, Default)]
pub struct TaskCounter {
    live: Arc<AtomicUsize>,
}

impl TaskCounter {
    /// Create a counter with no live tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a task as alive until the returned guard is dropped.
    pub fn enter(&self) -> TaskGuard {
        self.live.fetch_add(1, Ordering::SeqCst);
        TaskGuard {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of guards currently alive.
    pub fn count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Keeps a task counted in its [`TaskCounter`] until dropped.
pub struct TaskGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(token.clone().is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("already-cancelled token should resolve");
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });
        tokio::task::yield_now().await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[test]
    fn task_counter_tracks_guards() {
        let counter = TaskCounter::new();
        let a = counter.enter();
        let b = counter.enter();
        assert_eq!(counter.count(), 2);
        drop(a);
        assert_eq!(counter.count(), 1);
        drop(b);
        assert_eq!(counter.count(), 0);
    }
}
