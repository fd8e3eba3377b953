//! First-answer-wins race across providers.
//!
//! # Flow
//!
//! ```text
//! race() ──spawn──> fetcher task x N ──(first success)──> result channel + cancel token
//!    │                     │
//!    │                     └── CompletionGuard dropped on exit
//!    │
//!    ├──spawn──> waiter: tracker.wait() then drop the only strong sender
//!    │
//!    └── select! { biased; deadline | channel recv/close | token cancelled }
//! ```
//!
//! Fetcher tasks hold only weak handles to the result channel, so the channel
//! closes exactly when the waiter sees every fetcher finish. A closed channel
//! with nothing in it means every provider failed.

use crate::LookupError;
use crate::tracker::{CompletionGuard, CompletionTracker};
use cepfetch_providers::Fetcher;
use cepfetch_types::{AddressResult, LookupKey};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// State shared by every fetcher task of one race.
struct RaceContext {
    token: CancellationToken,
    results: mpsc::WeakSender<AddressResult>,
    claimed: AtomicBool,
}

impl RaceContext {
    /// Publish a winning result. Returns `true` only for the one result the
    /// race actually received; later successes and results that arrive after
    /// the race returned are dropped.
    fn publish(&self, address: AddressResult) -> bool {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return false;
        }

        let delivered = self
            .results
            .upgrade()
            .is_some_and(|tx| tx.try_send(address).is_ok());
        if !delivered {
            tracing::debug!("Result channel closed before publish; race already returned");
        }

        // Publish before cancelling: whoever observes the token finds the value buffered.
        self.token.cancel();
        delivered
    }
}

struct FetcherTask {
    fetcher: Arc<dyn Fetcher>,
    key: LookupKey,
    context: Arc<RaceContext>,
    _done: CompletionGuard,
}

impl FetcherTask {
    async fn run(self) {
        let source = self.fetcher.source();
        let token = &self.context.token;

        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            outcome = self.fetcher.fetch(&self.key) => Some(outcome),
        };

        match outcome {
            None => tracing::debug!(provider = %source, "Lookup aborted; race settled"),
            Some(Ok(address)) => {
                if self.context.publish(address) {
                    tracing::info!(provider = %source, cep = %self.key, "Provider answered first");
                } else {
                    tracing::debug!(provider = %source, "Discarding late result");
                }
            }
            Some(Err(error)) => {
                tracing::warn!(provider = %source, cep = %self.key, %error, "Provider lookup failed");
            }
        }
    }
}

/// Race every fetcher for `key` and return the first address, bounded by `deadline`.
///
/// The race token is a child of `parent`; cancelling `parent` ends the race
/// with [`LookupError::Cancelled`]. The race token is cancelled on every exit
/// path, so fetchers still in flight stop even after this returns.
pub async fn race(
    fetchers: &[Arc<dyn Fetcher>],
    key: LookupKey,
    deadline: Duration,
    parent: &CancellationToken,
) -> Result<AddressResult, LookupError> {
    if fetchers.is_empty() {
        return Err(LookupError::NoProviders);
    }

    let started = Instant::now();
    // Armed before any fetcher starts so no transport timeout can expire first.
    let expired = tokio::time::sleep(deadline);
    tokio::pin!(expired);
    let token = parent.child_token();
    let _cancel_on_exit = token.clone().drop_guard();

    let (tx, mut rx) = mpsc::channel(fetchers.len());
    let context = Arc::new(RaceContext {
        token: token.clone(),
        results: tx.downgrade(),
        claimed: AtomicBool::new(false),
    });

    let tracker = CompletionTracker::new();
    for fetcher in fetchers {
        tracing::debug!(provider = %fetcher.source(), cep = %key, "Launching fetcher");
        let task = FetcherTask {
            fetcher: Arc::clone(fetcher),
            key: key.clone(),
            context: Arc::clone(&context),
            _done: tracker.enter(),
        };
        tokio::spawn(task.run());
    }
    drop(context);

    tokio::spawn(async move {
        tracker.wait().await;
        tracing::debug!("All fetchers finished; closing result channel");
        drop(tx);
    });

    let outcome = tokio::select! {
        biased;
        () = &mut expired => Err(LookupError::Timeout(deadline)),
        received = rx.recv() => match received {
            Some(address) => Ok(address),
            None if token.is_cancelled() => Err(LookupError::Cancelled),
            None => Err(LookupError::NoProviderSucceeded { attempted: fetchers.len() }),
        },
        () = token.cancelled() => rx.try_recv().map_err(|_| LookupError::Cancelled),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(address) => {
            tracing::debug!(provider = %address.source(), elapsed_ms, "Race won");
        }
        Err(error) => tracing::warn!(cep = %key, %error, elapsed_ms, "Lookup failed"),
    }
    outcome
}
