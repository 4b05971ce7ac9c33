//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `BusinessId`, `CampaignId`, `StampId`
//! - **Catalog**: `Business`, `Campaign`, `GeoPoint`
//! - **Ledger**: `Stamp`

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::CampaignValidationError;
use crate::time::Timestamp;

/// Default proximity threshold for location-gated campaigns, in meters.
pub const DEFAULT_PROXIMITY_THRESHOLD_METERS: f64 = 100.0;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an identifier from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrows the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Authenticated customer identifier supplied by the session collaborator.
    UserId
);
string_id!(
    /// Merchant identifier.
    BusinessId
);
string_id!(
    /// Loyalty campaign identifier.
    CampaignId
);

/// Ledger row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampId(pub Uuid);

impl StampId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER B: CATALOG
// =============================================================================

/// A point on the earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A merchant and its registered location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    /// Registered storefront location. `None` means the business never set one,
    /// which makes every location-gated campaign fail closed.
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Why a campaign currently refuses to issue stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InactiveReason {
    /// The owner switched the campaign off.
    Disabled,
    /// `start_date` is still in the future.
    NotStarted { starts_at: Timestamp },
    /// `end_date` has passed.
    Ended { ended_at: Timestamp },
}

impl fmt::Display for InactiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "campaign is disabled"),
            Self::NotStarted { starts_at } => write!(f, "campaign starts at {}", starts_at),
            Self::Ended { ended_at } => write!(f, "campaign ended at {}", ended_at),
        }
    }
}

fn default_proximity_threshold() -> f64 {
    DEFAULT_PROXIMITY_THRESHOLD_METERS
}

fn default_active() -> bool {
    true
}

/// A business's loyalty offer.
///
/// Owned by exactly one business. `stamp_goal` unredeemed stamps complete a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub business_id: BusinessId,
    pub name: String,
    pub stamp_goal: u32,
    pub reward: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub location_required: bool,
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold_meters: f64,
    #[serde(default)]
    pub start_date: Option<Timestamp>,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
}

impl Campaign {
    /// Creates an active, ungated campaign with the default proximity threshold.
    pub fn new(
        id: impl Into<CampaignId>,
        business_id: impl Into<BusinessId>,
        name: impl Into<String>,
        stamp_goal: u32,
        reward: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            business_id: business_id.into(),
            name: name.into(),
            stamp_goal,
            reward: reward.into(),
            is_active: true,
            location_required: false,
            proximity_threshold_meters: DEFAULT_PROXIMITY_THRESHOLD_METERS,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_location_required(mut self, threshold_meters: f64) -> Self {
        self.location_required = true;
        self.proximity_threshold_meters = threshold_meters;
        self
    }

    pub fn with_schedule(mut self, start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Checks the structural rules a stored campaign must satisfy.
    pub fn validate(&self) -> Result<(), CampaignValidationError> {
        if self.stamp_goal < 1 {
            return Err(CampaignValidationError::InvalidStampGoal(self.stamp_goal));
        }
        if !self.proximity_threshold_meters.is_finite() || self.proximity_threshold_meters < 0.0 {
            return Err(CampaignValidationError::InvalidProximityThreshold(
                self.proximity_threshold_meters,
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(CampaignValidationError::InvalidSchedule { start, end });
            }
        }
        Ok(())
    }

    /// Decides whether the campaign may issue a stamp at `now`.
    ///
    /// Already-redeemed history is unaffected by the outcome.
    pub fn issuance_status(&self, now: Timestamp) -> Result<(), InactiveReason> {
        if !self.is_active {
            return Err(InactiveReason::Disabled);
        }
        if let Some(starts_at) = self.start_date {
            if now < starts_at {
                return Err(InactiveReason::NotStarted { starts_at });
            }
        }
        if let Some(ended_at) = self.end_date {
            if now > ended_at {
                return Err(InactiveReason::Ended { ended_at });
            }
        }
        Ok(())
    }

    pub fn is_issuing(&self, now: Timestamp) -> bool {
        self.issuance_status(now).is_ok()
    }
}

// =============================================================================
// CLUSTER C: LEDGER
// =============================================================================

/// One stamp unit in the append-only ledger.
///
/// Never deleted. The only mutation is the one-way `redeemed: false -> true`
/// transition, which also sets `redeemed_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub id: StampId,
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub campaign_id: CampaignId,
    pub redeemed: bool,
    pub redeemed_at: Option<Timestamp>,
    pub issued_location: Option<GeoPoint>,
    pub created_at: Timestamp,
}

impl Stamp {
    /// Creates a fresh unredeemed stamp.
    pub fn issue(
        user_id: UserId,
        business_id: BusinessId,
        campaign_id: CampaignId,
        issued_location: Option<GeoPoint>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: StampId::generate(),
            user_id,
            business_id,
            campaign_id,
            redeemed: false,
            redeemed_at: None,
            issued_location,
            created_at,
        }
    }

    /// Applies the one-way redemption transition.
    ///
    /// Returns `false` without touching the stamp if it was already redeemed.
    pub fn mark_redeemed(&mut self, at: Timestamp) -> bool {
        if self.redeemed {
            return false;
        }
        self.redeemed = true;
        self.redeemed_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_campaign_defaults() {
        let campaign = Campaign::new("c1", "b1", "Coffee", 5, "Free latte");
        assert!(campaign.is_active);
        assert!(!campaign.location_required);
        assert_eq!(campaign.proximity_threshold_meters, 100.0);
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn test_campaign_deserialize_defaults() {
        let json = r#"{"id":"c1","business_id":"b1","name":"Coffee","stamp_goal":3,"reward":"Cookie"}"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert!(campaign.is_active);
        assert_eq!(campaign.proximity_threshold_meters, DEFAULT_PROXIMITY_THRESHOLD_METERS);
        assert_eq!(campaign.end_date, None);
    }

    #[test]
    fn test_zero_goal_rejected() {
        let campaign = Campaign::new("c1", "b1", "Coffee", 0, "Free latte");
        assert_eq!(
            campaign.validate(),
            Err(CampaignValidationError::InvalidStampGoal(0))
        );
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let campaign = Campaign::new("c1", "b1", "Coffee", 5, "Free").with_location_required(-1.0);
        assert!(matches!(
            campaign.validate(),
            Err(CampaignValidationError::InvalidProximityThreshold(_))
        ));
    }

    #[test]
    fn test_inverted_schedule_rejected() {
        let campaign = Campaign::new("c1", "b1", "Coffee", 5, "Free")
            .with_schedule(Some(t0()), Some(t0() - Duration::days(1)));
        assert!(matches!(
            campaign.validate(),
            Err(CampaignValidationError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn test_issuance_status() {
        let campaign = Campaign::new("c1", "b1", "Coffee", 5, "Free")
            .with_schedule(Some(t0()), Some(t0() + Duration::days(30)));

        assert_eq!(
            campaign.issuance_status(t0() - Duration::hours(1)),
            Err(InactiveReason::NotStarted { starts_at: t0() })
        );
        assert!(campaign.is_issuing(t0()));
        assert!(campaign.is_issuing(t0() + Duration::days(30)));
        assert!(matches!(
            campaign.issuance_status(t0() + Duration::days(31)),
            Err(InactiveReason::Ended { .. })
        ));
        assert_eq!(
            campaign.deactivated().issuance_status(t0()),
            Err(InactiveReason::Disabled)
        );
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(40.7128, -74.0060).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_stamp_redemption_is_one_way() {
        let mut stamp = Stamp::issue("u1".into(), "b1".into(), "c1".into(), None, t0());
        assert!(!stamp.redeemed);

        let at = t0() + Duration::minutes(5);
        assert!(stamp.mark_redeemed(at));
        assert_eq!(stamp.redeemed_at, Some(at));

        // Second transition is refused and keeps the first timestamp
        assert!(!stamp.mark_redeemed(at + Duration::minutes(5)));
        assert_eq!(stamp.redeemed_at, Some(at));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CampaignId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_eq!(id.to_string(), "abc");
    }
}
