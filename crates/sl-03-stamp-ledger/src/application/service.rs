//! Stamp Ledger Service
//!
//! Main service implementing `StampLedgerApi` over any `StampStore`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use loyalty_telemetry::{STAMPS_ISSUED, STAMPS_REDEEMED};
use shared_types::{
    BusinessId, CampaignId, GeoPoint, Stamp, SystemTimeSource, TimeSource, UserId,
};
use tracing::{debug, info, warn};

use crate::domain::entities::{LedgerKey, RedeemOutcome, Redemption};
use crate::domain::errors::LedgerError;
use crate::ports::inbound::StampLedgerApi;
use crate::ports::outbound::StampStore;

/// Stamp Ledger Service
///
/// Stamps `created_at` and `redeemed_at` from its clock, then delegates to
/// the store. Holds no per-pair state of its own.
pub struct StampLedgerService {
    store: Arc<dyn StampStore>,
    clock: Arc<dyn TimeSource>,
}

impl StampLedgerService {
    /// Create a service on the system clock
    pub fn new(store: Arc<dyn StampStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemTimeSource))
    }

    /// Create a service with an injected clock
    pub fn with_clock(store: Arc<dyn StampStore>, clock: Arc<dyn TimeSource>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl StampLedgerApi for StampLedgerService {
    async fn append_stamp(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
        campaign_id: &CampaignId,
        issued_location: Option<GeoPoint>,
    ) -> Result<Stamp, LedgerError> {
        let stamp = Stamp::issue(
            user_id.clone(),
            business_id.clone(),
            campaign_id.clone(),
            issued_location,
            self.clock.now(),
        );

        self.store.insert(stamp.clone()).await?;
        STAMPS_ISSUED.inc();

        debug!(
            stamp_id = %stamp.id,
            user = %user_id,
            campaign = %campaign_id,
            "[sl-03] Stamp appended"
        );
        Ok(stamp)
    }

    async fn count_unredeemed(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
    ) -> Result<u32, LedgerError> {
        let key = LedgerKey::new(user_id.clone(), campaign_id.clone());
        Ok(self.store.count_unredeemed(&key).await?)
    }

    async fn redeem_oldest(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        n: u32,
    ) -> Result<Redemption, LedgerError> {
        let key = LedgerKey::new(user_id.clone(), campaign_id.clone());
        let redeemed_at = self.clock.now();

        match self.store.redeem_oldest(&key, n, redeemed_at).await? {
            RedeemOutcome::Redeemed(stamp_ids) => {
                STAMPS_REDEEMED.inc_by(stamp_ids.len() as u64);
                info!(
                    user = %user_id,
                    campaign = %campaign_id,
                    redeemed = stamp_ids.len(),
                    "[sl-03] Redeemed oldest stamps"
                );
                Ok(Redemption {
                    stamp_ids,
                    redeemed_at,
                })
            }
            RedeemOutcome::Insufficient { available } => {
                warn!(
                    user = %user_id,
                    campaign = %campaign_id,
                    required = n,
                    available,
                    "[sl-03] Redemption refused: insufficient stamps"
                );
                Err(LedgerError::InsufficientStamps {
                    required: n,
                    available,
                })
            }
        }
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Stamp>, LedgerError> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    async fn count_unredeemed_by_campaign(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<CampaignId, u32>, LedgerError> {
        Ok(self.store.unredeemed_by_campaign(user_id).await?)
    }
}
