//! Error types for the cycle engine

use shared_types::{BusinessId, CampaignId, InactiveReason, StorageError};
use sl_02_qr_codec::DecodeError;
use sl_03_stamp_ledger::LedgerError;
use thiserror::Error;

/// Every way a scan can be refused.
///
/// None of these is retried inside the engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScanError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] DecodeError),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    #[error("Campaign {campaign_id} is not issuing stamps: {reason}")]
    CampaignInactive {
        campaign_id: CampaignId,
        reason: InactiveReason,
    },

    /// The QR code names a business that does not own the campaign.
    #[error("Payload claims business {claimed} but campaign {campaign_id} belongs to {owner}")]
    PayloadMismatch {
        campaign_id: CampaignId,
        owner: BusinessId,
        claimed: BusinessId,
    },

    /// Only raised by payload verification; scans fail closed to `OutOfRange`.
    #[error("Business not found: {0}")]
    BusinessNotFound(BusinessId),

    #[error("Out of range: {} from business, threshold {threshold_meters}m", format_distance(.distance_meters))]
    OutOfRange {
        /// `None` when either location was unknown.
        distance_meters: Option<f64>,
        threshold_meters: f64,
    },

    /// A concurrent redemption consumed the stamps this scan meant to redeem.
    #[error("Concurrent redemption: required {required} stamps, {available} available")]
    ConcurrentRedemption { required: u32, available: u32 },

    #[error("Infrastructure failure: {0}")]
    Infrastructure(#[from] StorageError),
}

fn format_distance(distance: &Option<f64>) -> String {
    match distance {
        Some(d) => format!("{d:.1}m"),
        None => "unknown distance".to_string(),
    }
}

impl ScanError {
    /// Stable snake_case label, used for metrics and wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::CampaignNotFound(_) => "campaign_not_found",
            Self::CampaignInactive { .. } => "campaign_inactive",
            Self::PayloadMismatch { .. } => "payload_mismatch",
            Self::BusinessNotFound(_) => "business_not_found",
            Self::OutOfRange { .. } => "out_of_range",
            Self::ConcurrentRedemption { .. } => "concurrent_redemption",
            Self::Infrastructure(_) => "infrastructure",
        }
    }

    /// Validation failures: the scan itself was wrong.
    pub fn is_client_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidPayload(_)
                | Self::CampaignNotFound(_)
                | Self::CampaignInactive { .. }
                | Self::PayloadMismatch { .. }
                | Self::BusinessNotFound(_)
                | Self::OutOfRange { .. }
        )
    }

    /// Safe to re-issue the same scan once.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentRedemption { .. })
    }
}

impl From<LedgerError> for ScanError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStamps {
                required,
                available,
            } => Self::ConcurrentRedemption {
                required,
                available,
            },
            LedgerError::Storage(e) => Self::Infrastructure(e),
        }
    }
}
