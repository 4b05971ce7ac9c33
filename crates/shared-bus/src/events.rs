//! # Loyalty Events
//!
//! Defines all event types that flow through the shared bus.
//! The cycle engine is the only publisher; notification delivery is the
//! subscriber's concern.

use serde::{Deserialize, Serialize};
use shared_types::{BusinessId, CampaignId, StampId, Timestamp, UserId};

/// Reward-earned domain event handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEarned {
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub business_id: BusinessId,
    pub reward: String,
    pub earned_at: Timestamp,
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoyaltyEvent {
    // =========================================================================
    // ISSUANCE
    // =========================================================================
    /// A stamp was appended to the ledger by a scan.
    StampIssued {
        stamp_id: StampId,
        user_id: UserId,
        business_id: BusinessId,
        campaign_id: CampaignId,
        issued_at: Timestamp,
    },

    // =========================================================================
    // REDEMPTION
    // =========================================================================
    /// A completed card was redeemed; exactly `stamp_ids.len()` stamps flipped.
    StampsRedeemed {
        user_id: UserId,
        business_id: BusinessId,
        campaign_id: CampaignId,
        stamp_ids: Vec<StampId>,
        redeemed_at: Timestamp,
    },

    /// The user earned the campaign reward. Triggers the push notification.
    RewardEarned(RewardEarned),
}

impl LoyaltyEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::StampIssued { .. } => EventTopic::Issuance,
            Self::StampsRedeemed { .. } => EventTopic::Redemption,
            Self::RewardEarned(_) => EventTopic::Rewards,
        }
    }

    /// The customer this event concerns.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::StampIssued { user_id, .. } | Self::StampsRedeemed { user_id, .. } => user_id,
            Self::RewardEarned(reward) => &reward.user_id,
        }
    }

    /// The campaign this event concerns.
    #[must_use]
    pub fn campaign_id(&self) -> &CampaignId {
        match self {
            Self::StampIssued { campaign_id, .. } | Self::StampsRedeemed { campaign_id, .. } => {
                campaign_id
            }
            Self::RewardEarned(reward) => &reward.campaign_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Stamp issuance.
    Issuance,
    /// Ledger redemption.
    Redemption,
    /// Reward notifications.
    Rewards,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Users to include. Empty means all users.
    pub user_ids: Vec<UserId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            user_ids: Vec::new(),
        }
    }

    /// Create a filter for events about specific users.
    #[must_use]
    pub fn for_users(user_ids: Vec<UserId>) -> Self {
        Self {
            topics: Vec::new(),
            user_ids,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LoyaltyEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let user_match = self.user_ids.is_empty() || self.user_ids.contains(event.user_id());

        topic_match && user_match
    }
}
