//! Inbound Ports (Driving Ports / API)

use std::collections::BTreeMap;

use async_trait::async_trait;
use shared_types::{BusinessId, CampaignId, GeoPoint, Stamp, UserId};

use crate::domain::entities::Redemption;
use crate::domain::errors::LedgerError;

/// Primary Stamp Ledger API
#[async_trait]
pub trait StampLedgerApi: Send + Sync {
    /// Append one unredeemed stamp.
    ///
    /// No uniqueness constraint: repeated stamps for the same pair are the
    /// progress itself.
    async fn append_stamp(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
        campaign_id: &CampaignId,
        issued_location: Option<GeoPoint>,
    ) -> Result<Stamp, LedgerError>;

    /// Authoritative progress for a pair.
    async fn count_unredeemed(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
    ) -> Result<u32, LedgerError>;

    /// Redeem the `n` oldest unredeemed stamps of a pair.
    ///
    /// Fails with [`LedgerError::InsufficientStamps`] and changes nothing if
    /// fewer than `n` exist at the time of selection.
    async fn redeem_oldest(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        n: u32,
    ) -> Result<Redemption, LedgerError>;

    /// Every stamp the user holds, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Stamp>, LedgerError>;

    /// Unredeemed counts per campaign; campaigns at zero are omitted.
    async fn count_unredeemed_by_campaign(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<CampaignId, u32>, LedgerError>;
}
