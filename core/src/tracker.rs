//! Completion tracking for the fetchers of one race.
//!
//! Each fetcher holds a [`CompletionGuard`] for its whole lifetime; dropping the
//! guard (normal return, early abort, or a panic unwinding the task) counts as
//! "done". [`CompletionTracker::wait`] resolves once every guard is gone.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<Inner>,
}

impl CompletionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more party. Must happen before [`Self::wait`] can observe zero.
    #[must_use]
    pub fn enter(&self) -> CompletionGuard {
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        CompletionGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Resolve once no guards remain.
    pub async fn wait(&self) {
        loop {
            let mut notified = pin!(self.inner.notify.notified());
            // Register interest before checking so a concurrent final drop cannot be missed.
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Signals completion exactly once, on drop.
#[derive(Debug)]
pub struct CompletionGuard {
    inner: Arc<Inner>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.notify.notify_waiters();
        }
    }
}
