//! Card state, derived from the ledger.
//!
//! Building and Complete are never persisted. They are recomputed from the
//! unredeemed count every time, so the ledger stays the only source of truth.

use serde::{Deserialize, Serialize};
use shared_types::{BusinessId, CampaignId, Stamp};

/// Where a (user, campaign) pair stands against its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardState {
    Building { count: u32, goal: u32 },
    Complete { count: u32, goal: u32 },
}

impl CardState {
    pub fn from_count(count: u32, goal: u32) -> Self {
        if count >= goal {
            Self::Complete { count, goal }
        } else {
            Self::Building { count, goal }
        }
    }

    pub fn count(&self) -> u32 {
        match *self {
            Self::Building { count, .. } | Self::Complete { count, .. } => count,
        }
    }

    pub fn goal(&self) -> u32 {
        match *self {
            Self::Building { goal, .. } | Self::Complete { goal, .. } => goal,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Stamps still needed; zero once complete.
    pub fn remaining(&self) -> u32 {
        self.goal().saturating_sub(self.count())
    }
}

/// Derive the state of one pair from a ledger snapshot of that pair.
pub fn derive_state(stamps: &[Stamp], goal: u32) -> CardState {
    let unredeemed = stamps.iter().filter(|s| !s.redeemed).count();
    CardState::from_count(u32::try_from(unredeemed).unwrap_or(u32::MAX), goal)
}

/// A loyalty card as shown to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyCard {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub business_id: BusinessId,
    pub business_name: Option<String>,
    pub reward: String,
    pub current_count: u32,
    pub stamp_goal: u32,
    pub state: CardState,
}
