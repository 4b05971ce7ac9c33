//! In-memory stamp store.
//!
//! One write lock covers selection and marking in `redeem_oldest`, which is
//! what makes the conditional redemption atomic for this adapter.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CampaignId, Stamp, StampId, StorageError, Timestamp, UserId};
use tracing::debug;

use crate::domain::entities::{LedgerKey, RedeemOutcome};
use crate::ports::outbound::StampStore;

struct LedgerRow {
    /// Insertion order; breaks `created_at` ties.
    seq: u64,
    stamp: Stamp,
}

#[derive(Default)]
struct LedgerState {
    rows: Vec<LedgerRow>,
    ids: HashSet<StampId>,
    by_pair: HashMap<LedgerKey, Vec<usize>>,
    by_user: HashMap<UserId, Vec<usize>>,
    next_seq: u64,
}

/// Ledger rows held in process memory.
#[derive(Default)]
pub struct InMemoryStampStore {
    state: RwLock<LedgerState>,
}

impl InMemoryStampStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows, redeemed or not.
    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every row for a pair, in insertion order.
    pub fn rows_for(&self, key: &LedgerKey) -> Vec<Stamp> {
        let state = self.state.read();
        state
            .by_pair
            .get(key)
            .map(|ix| ix.iter().map(|&i| state.rows[i].stamp.clone()).collect())
            .unwrap_or_default()
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[async_trait]
impl StampStore for InMemoryStampStore {
    async fn insert(&self, stamp: Stamp) -> Result<(), StorageError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        if !state.ids.insert(stamp.id) {
            return Err(StorageError::Backend(format!("duplicate stamp id {}", stamp.id)));
        }

        let index = state.rows.len();
        let key = LedgerKey::new(stamp.user_id.clone(), stamp.campaign_id.clone());
        state.by_pair.entry(key).or_default().push(index);
        state
            .by_user
            .entry(stamp.user_id.clone())
            .or_default()
            .push(index);

        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.push(LedgerRow { seq, stamp });
        Ok(())
    }

    async fn count_unredeemed(&self, key: &LedgerKey) -> Result<u32, StorageError> {
        let state = self.state.read();
        let count = state
            .by_pair
            .get(key)
            .map(|ix| ix.iter().filter(|&&i| !state.rows[i].stamp.redeemed).count())
            .unwrap_or(0);
        Ok(saturating_u32(count))
    }

    async fn redeem_oldest(
        &self,
        key: &LedgerKey,
        n: u32,
        at: Timestamp,
    ) -> Result<RedeemOutcome, StorageError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let mut candidates: Vec<usize> = match state.by_pair.get(key) {
            Some(ix) => ix
                .iter()
                .copied()
                .filter(|&i| !state.rows[i].stamp.redeemed)
                .collect(),
            None => Vec::new(),
        };

        if candidates.len() < n as usize {
            debug!(
                user = %key.user_id,
                campaign = %key.campaign_id,
                requested = n,
                available = candidates.len(),
                "[sl-03] Conditional redemption refused"
            );
            return Ok(RedeemOutcome::Insufficient {
                available: saturating_u32(candidates.len()),
            });
        }

        let rows = &mut state.rows;
        candidates.sort_by(|&a, &b| {
            rows[a]
                .stamp
                .created_at
                .cmp(&rows[b].stamp.created_at)
                .then(rows[a].seq.cmp(&rows[b].seq))
        });
        candidates.truncate(n as usize);

        let mut redeemed = Vec::with_capacity(candidates.len());
        for i in candidates {
            let stamp = &mut rows[i].stamp;
            if stamp.mark_redeemed(at) {
                redeemed.push(stamp.id);
            }
        }

        Ok(RedeemOutcome::Redeemed(redeemed))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Stamp>, StorageError> {
        let state = self.state.read();
        let Some(ix) = state.by_user.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&LedgerRow> = ix.iter().map(|&i| &state.rows[i]).collect();
        rows.sort_by(|a, b| {
            b.stamp
                .created_at
                .cmp(&a.stamp.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.stamp.clone()).collect())
    }

    async fn unredeemed_by_campaign(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<CampaignId, u32>, StorageError> {
        let state = self.state.read();
        let mut counts = BTreeMap::new();
        if let Some(ix) = state.by_user.get(user_id) {
            for &i in ix {
                let stamp = &state.rows[i].stamp;
                if !stamp.redeemed {
                    *counts.entry(stamp.campaign_id.clone()).or_insert(0u32) += 1;
                }
            }
        }
        Ok(counts)
    }
}
