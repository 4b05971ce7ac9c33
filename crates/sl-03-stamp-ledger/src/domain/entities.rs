//! Ledger value types.

use serde::{Deserialize, Serialize};
use shared_types::{CampaignId, StampId, Timestamp, UserId};

/// The unit of progress: one customer on one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerKey {
    pub user_id: UserId,
    pub campaign_id: CampaignId,
}

impl LedgerKey {
    pub fn new(user_id: UserId, campaign_id: CampaignId) -> Self {
        Self {
            user_id,
            campaign_id,
        }
    }
}

/// Result of the storage-level conditional redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Exactly the requested number of rows were flipped, oldest first.
    Redeemed(Vec<StampId>),
    /// Nothing was flipped; only `available` unredeemed rows existed.
    Insufficient { available: u32 },
}

/// A completed redemption cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    /// Redeemed stamp ids, oldest first.
    pub stamp_ids: Vec<StampId>,
    pub redeemed_at: Timestamp,
}

impl Redemption {
    pub fn len(&self) -> usize {
        self.stamp_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamp_ids.is_empty()
    }
}
