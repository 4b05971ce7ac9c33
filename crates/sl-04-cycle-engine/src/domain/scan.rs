//! Scan input and output.

use serde::{Deserialize, Serialize};
use shared_types::{BusinessId, CampaignId, GeoPoint, StampId, UserId};

/// A scan as received from the session collaborator.
///
/// `user_id` is already authenticated. `payload` is the raw QR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub user_id: UserId,
    pub payload: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl ScanRequest {
    pub fn new(user_id: impl Into<UserId>, payload: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            payload: payload.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}

/// Outcome of an accepted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub campaign_id: CampaignId,
    pub business_id: BusinessId,
    /// The stamp this scan appended.
    pub stamp_id: StampId,
    pub reward_earned: bool,
    /// Unredeemed count after the scan, rollover included.
    pub current_count: u32,
    pub stamp_goal: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

/// Authoritative view of a scanned payload, for the confirm screen.
///
/// Names come from the directory, never from the payload's display hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedPayload {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub business_id: BusinessId,
    pub business_name: String,
    pub reward: String,
    pub stamp_goal: u32,
    pub location_required: bool,
    /// Whether a scan right now would pass the activity check.
    pub issuing: bool,
}
