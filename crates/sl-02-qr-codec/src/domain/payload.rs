//! Decoded payload types.

use serde::{Deserialize, Serialize};
use shared_types::{BusinessId, CampaignId};
use std::fmt;

/// Wire discriminator values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// Grants one stamp for a campaign.
    Stamp,
}

impl PayloadKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stamp => "stamp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stamp" => Some(Self::Stamp),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-only names carried in the payload.
///
/// Shown to the customer before confirming a scan. Never trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHints {
    pub business_name: Option<String>,
    pub campaign_name: Option<String>,
}

impl DisplayHints {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none() && self.campaign_name.is_none()
    }
}

/// A fully decoded scan payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    pub kind: PayloadKind,
    pub campaign_id: CampaignId,
    /// The business the QR code claims to belong to; checked against the
    /// campaign's real owner before any stamp is issued.
    pub business_id: BusinessId,
    #[serde(default)]
    pub display: DisplayHints,
}

impl DecodedPayload {
    pub fn stamp(campaign_id: impl Into<CampaignId>, business_id: impl Into<BusinessId>) -> Self {
        Self {
            kind: PayloadKind::Stamp,
            campaign_id: campaign_id.into(),
            business_id: business_id.into(),
            display: DisplayHints::default(),
        }
    }
}
