//! Background chain-tip poller
//!
//! Periodically asks a [`BlockHeightSource`] for the latest block height and
//! offers it to the [`ChainStateStore`]. Failed fetches never stop the loop;
//! the previous height is kept and the failure is reported to the
//! configured [`PollObserver`].

use crate::errors::RpcError;
use crate::rpc::BlockHeightSource;
use crate::store::{ChainStateStore, HeightUpdate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a single poll iteration did
#[derive(Debug)]
pub enum PollOutcome {
    Advanced { previous: u64, current: u64 },
    Unchanged { current: u64, fetched: u64 },
    Failed(RpcError),
}

/// Hook for reporting poll results. All methods default to doing nothing.
pub trait PollObserver: Send + Sync {
    fn on_advanced(&self, _previous: u64, _current: u64) {}

    fn on_unchanged(&self, _current: u64, _fetched: u64) {}

    fn on_failure(&self, _error: &RpcError, _consecutive_failures: u64) {}
}

impl PollObserver for () {}

/// Counters for poll results, safe to share with other tasks
#[derive(Debug, Default)]
pub struct PollStats {
    polls: AtomicU64,
    advances: AtomicU64,
    failures: AtomicU64,
    last_fetched: AtomicU64,
}

/// Point-in-time copy of [`PollStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollStatsSnapshot {
    pub polls: u64,
    pub advances: u64,
    pub failures: u64,
    pub last_fetched: u64,
}

impl PollStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PollStatsSnapshot {
        PollStatsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            advances: self.advances.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            last_fetched: self.last_fetched.load(Ordering::Relaxed),
        }
    }
}

impl PollStatsSnapshot {
    /// Share of polls that failed, as a percentage
    pub fn failure_rate(&self) -> f64 {
        if self.polls == 0 {
            0.0
        } else {
            (self.failures as f64 / self.polls as f64) * 100.0
        }
    }
}

impl PollObserver for PollStats {
    fn on_advanced(&self, _previous: u64, current: u64) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.advances.fetch_add(1, Ordering::Relaxed);
        self.last_fetched.store(current, Ordering::Relaxed);
    }

    fn on_unchanged(&self, _current: u64, fetched: u64) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.last_fetched.store(fetched, Ordering::Relaxed);
    }

    fn on_failure(&self, _error: &RpcError, _consecutive_failures: u64) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Refreshes the store's height from `source` every `interval`
pub struct Poller<S> {
    store: Arc<ChainStateStore>,
    source: S,
    interval: Duration,
    observer: Arc<dyn PollObserver>,
    consecutive_failures: u64,
}

impl<S: BlockHeightSource + 'static> Poller<S> {
    pub fn new(store: Arc<ChainStateStore>, source: S, interval: Duration) -> Self {
        Self {
            store,
            source,
            interval,
            observer: Arc::new(()),
            consecutive_failures: 0,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch once and apply the result. The store lock is only taken after
    /// the fetch has completed.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let fetched = match self.source.fetch_latest_block_height().await {
            Ok(height) => height,
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    "Unable to fetch latest block ({} consecutive failures), keeping height {}: {}",
                    self.consecutive_failures,
                    self.store.current_block(),
                    e
                );
                self.observer.on_failure(&e, self.consecutive_failures);
                return PollOutcome::Failed(e);
            }
        };

        if self.consecutive_failures > 0 {
            info!(
                "Block height source recovered after {} failures",
                self.consecutive_failures
            );
            self.consecutive_failures = 0;
        }

        match self.store.advance_height(fetched) {
            HeightUpdate::Advanced { previous, current } => {
                info!("New block detected: {}", current);
                self.observer.on_advanced(previous, current);
                PollOutcome::Advanced { previous, current }
            }
            HeightUpdate::Unchanged { current, rejected } => {
                debug!(
                    "Fetched height {} not above current height {}",
                    rejected, current
                );
                self.observer.on_unchanged(current, rejected);
                PollOutcome::Unchanged {
                    current,
                    fetched: rejected,
                }
            }
        }
    }

    /// Poll, wait `interval`, repeat until `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Block poller started with {:?} interval", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.poll_once() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            "Block poller stopped at height {}",
            self.store.current_block()
        );
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
