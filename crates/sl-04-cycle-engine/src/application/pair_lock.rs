//! Per-(user, campaign) serialization.
//!
//! Scans for different pairs never contend. Two scans for the same pair run
//! their append/recount/redeem steps one after the other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use sl_03_stamp_ledger::LedgerKey;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async locks keyed by ledger pair.
///
/// Entries are created on first use and removed when the last holder or
/// waiter is gone, so the map only ever holds pairs with work in flight.
#[derive(Default)]
pub struct PairLocks {
    locks: Mutex<HashMap<LedgerKey, Arc<AsyncMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: LedgerKey) -> PairGuard<'_> {
        let entry = {
            let mut locks = self.locks.lock();
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = entry.clone().lock_owned().await;
        PairGuard {
            locks: self,
            key,
            entry,
            guard: Some(guard),
        }
    }

    /// Pairs currently held or awaited.
    pub fn in_flight(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Exclusive access to one pair; released on drop.
pub struct PairGuard<'a> {
    locks: &'a PairLocks,
    key: LedgerKey,
    entry: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl PairGuard<'_> {
    pub fn key(&self) -> &LedgerKey {
        &self.key
    }
}

impl Drop for PairGuard<'_> {
    fn drop(&mut self) {
        // Release first so the owned guard's Arc is gone before counting
        self.guard.take();

        let mut locks = self.locks.locks.lock();
        let idle = locks
            .get(&self.key)
            .is_some_and(|e| Arc::ptr_eq(e, &self.entry) && Arc::strong_count(&self.entry) == 2);
        if idle {
            locks.remove(&self.key);
        }
    }
}
