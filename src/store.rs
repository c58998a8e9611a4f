use crate::types::Transaction;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Everything guarded by the store's single lock
#[derive(Debug, Default)]
struct ChainState {
    height: u64,
    subscribers: HashSet<String>,
    transactions: HashMap<String, Vec<Transaction>>,
    known_hashes: HashSet<String>,
}

/// Result of offering a freshly fetched height to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightUpdate {
    /// Stored height moved forward
    Advanced { previous: u64, current: u64 },
    /// Candidate was not greater than the stored height (lagging or repeated)
    Unchanged { current: u64, rejected: u64 },
}

/// Thread-safe owner of the chain height, subscriptions and transaction log.
///
/// Every accessor takes the lock for a single read or write and returns
/// owned copies, so callers never see store-owned state. Share it as
/// `Arc<ChainStateStore>`.
#[derive(Debug, Default)]
pub struct ChainStateStore {
    state: Mutex<ChainState>,
}

impl ChainStateStore {
    /// Zero height, no subscribers, empty transaction log
    pub fn new() -> Self {
        Self::default()
    }

    // Critical sections never leave the state half-written, so a poisoned
    // lock still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last successfully observed height, 0 before the first successful poll
    pub fn current_block(&self) -> u64 {
        self.lock().height
    }

    /// Store `candidate` only if it is strictly greater than the current height
    pub fn advance_height(&self, candidate: u64) -> HeightUpdate {
        let mut state = self.lock();
        if candidate > state.height {
            let previous = state.height;
            state.height = candidate;
            HeightUpdate::Advanced {
                previous,
                current: candidate,
            }
        } else {
            HeightUpdate::Unchanged {
                current: state.height,
                rejected: candidate,
            }
        }
    }

    /// Register an address. Returns `false` if it was already subscribed.
    pub fn subscribe(&self, address: &str) -> bool {
        let inserted = self.lock().subscribers.insert(address.to_string());
        if inserted {
            debug!("New subscription: {}", address);
        }
        inserted
    }

    pub fn is_subscribed(&self, address: &str) -> bool {
        self.lock().subscribers.contains(address)
    }

    /// Sorted copy of every subscribed address
    pub fn subscribers(&self) -> Vec<String> {
        let mut subscribers: Vec<String> = self.lock().subscribers.iter().cloned().collect();
        subscribers.sort();
        subscribers
    }

    /// Recorded transactions for `address` in recording order, empty if none
    pub fn transactions(&self, address: &str) -> Vec<Transaction> {
        self.lock()
            .transactions
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a transaction to an address's log.
    ///
    /// Returns `false` without recording anything when a transaction with the
    /// same hash is already present anywhere in the log.
    pub fn record_transaction(&self, address: &str, transaction: Transaction) -> bool {
        let mut state = self.lock();
        if !state.known_hashes.insert(transaction.tx_hash.clone()) {
            debug!("Ignoring duplicate transaction {}", transaction.tx_hash);
            return false;
        }
        state
            .transactions
            .entry(address.to_string())
            .or_default()
            .push(transaction);
        true
    }
}
