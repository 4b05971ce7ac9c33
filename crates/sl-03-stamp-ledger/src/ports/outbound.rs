//! # Outbound Ports (Driven Ports)
//!
//! The storage collaborator the ledger needs. Any document or relational
//! store works as long as `redeem_oldest` is a single atomic unit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use shared_types::{CampaignId, Stamp, StorageError, Timestamp, UserId};

use crate::domain::entities::{LedgerKey, RedeemOutcome};

/// Abstract interface for stamp persistence.
///
/// Production: a table keyed by `(user_id, campaign_id)` with `redeemed`
/// and `created_at` as filter and sort fields.
/// Testing: `InMemoryStampStore`.
#[async_trait]
pub trait StampStore: Send + Sync {
    /// Persist a new row.
    async fn insert(&self, stamp: Stamp) -> Result<(), StorageError>;

    /// Count unredeemed rows for a pair.
    async fn count_unredeemed(&self, key: &LedgerKey) -> Result<u32, StorageError>;

    /// Conditionally redeem the `n` oldest unredeemed rows.
    ///
    /// ## Atomicity Guarantee
    ///
    /// Selection and marking happen as one unit: either exactly `n` rows
    /// flip to redeemed with `redeemed_at = at`, or none do and the current
    /// unredeemed count comes back as [`RedeemOutcome::Insufficient`].
    async fn redeem_oldest(
        &self,
        key: &LedgerKey,
        n: u32,
        at: Timestamp,
    ) -> Result<RedeemOutcome, StorageError>;

    /// All rows for a user, newest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Stamp>, StorageError>;

    /// Unredeemed counts per campaign for a user; zero counts omitted.
    async fn unredeemed_by_campaign(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<CampaignId, u32>, StorageError>;
}
