//! Cycle Engine Service
//!
//! Main service implementing `CycleEngineApi`.

use std::sync::Arc;

use async_trait::async_trait;
use loyalty_telemetry::{time_histogram, REWARDS_EARNED, SCANS_REJECTED, SCAN_DURATION};
use shared_bus::{EventPublisher, LoyaltyEvent, RewardEarned};
use shared_types::{Campaign, GeoPoint, SystemTimeSource, TimeSource, UserId};
use sl_01_geofence::{distance_if_known, is_within_proximity};
use sl_02_qr_codec::{decode_with_limit, DecodedPayload};
use sl_03_stamp_ledger::{LedgerKey, StampLedgerApi};
use tracing::{debug, info, warn};

use crate::application::pair_lock::PairLocks;
use crate::config::EngineConfig;
use crate::domain::errors::ScanError;
use crate::domain::scan::{ScanRequest, ScanResult, VerifiedPayload};
use crate::domain::state::{CardState, LoyaltyCard};
use crate::ports::inbound::CycleEngineApi;
use crate::ports::outbound::CampaignDirectory;

/// Cycle Engine Service
///
/// Orchestrates a scan:
/// 1. Decode payload
/// 2. Load campaign
/// 3. Check it is issuing
/// 4. Check the payload's business owns the campaign
/// 5. Geofence, if the campaign requires it
/// 6. Append a stamp
/// 7. Recount
/// 8. Below goal: report progress
/// 9. At goal: redeem the oldest `goal` stamps, seed the next card, emit
///    `RewardEarned`
///
/// Steps 6-9 run under the pair lock when `serialize_pairs` is on.
pub struct CycleEngineService {
    config: EngineConfig,
    directory: Arc<dyn CampaignDirectory>,
    ledger: Arc<dyn StampLedgerApi>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
    pair_locks: PairLocks,
}

impl CycleEngineService {
    /// Create a new service with default config and the system clock
    pub fn new(
        directory: Arc<dyn CampaignDirectory>,
        ledger: Arc<dyn StampLedgerApi>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config: EngineConfig::default(),
            directory,
            ledger,
            events,
            clock: Arc::new(SystemTimeSource),
            pair_locks: PairLocks::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Steps 1-4: decode and resolve the payload to an issuing campaign.
    async fn resolve_campaign(
        &self,
        payload: &DecodedPayload,
    ) -> Result<Campaign, ScanError> {
        let campaign = self
            .directory
            .get_campaign(&payload.campaign_id)
            .await?
            .ok_or_else(|| ScanError::CampaignNotFound(payload.campaign_id.clone()))?;

        campaign
            .issuance_status(self.clock.now())
            .map_err(|reason| ScanError::CampaignInactive {
                campaign_id: campaign.id.clone(),
                reason,
            })?;

        ensure_owner(&campaign, payload)?;
        Ok(campaign)
    }

    /// Step 5. Fails closed when either location is unknown.
    async fn check_proximity(
        &self,
        campaign: &Campaign,
        user_location: Option<&GeoPoint>,
    ) -> Result<(), ScanError> {
        let business = self.directory.get_business(&campaign.business_id).await?;
        let business_location = business.as_ref().and_then(|b| b.location.as_ref());
        let threshold = campaign.proximity_threshold_meters;

        if is_within_proximity(user_location, business_location, threshold) {
            return Ok(());
        }

        Err(ScanError::OutOfRange {
            distance_meters: distance_if_known(user_location, business_location),
            threshold_meters: threshold,
        })
    }

    /// Steps 6-9. The only mutating part of a scan.
    async fn accrue(
        &self,
        user_id: &UserId,
        campaign: &Campaign,
        location: Option<GeoPoint>,
    ) -> Result<ScanResult, ScanError> {
        let stamp = self
            .ledger
            .append_stamp(user_id, &campaign.business_id, &campaign.id, location)
            .await?;
        self.events
            .publish(LoyaltyEvent::StampIssued {
                stamp_id: stamp.id,
                user_id: user_id.clone(),
                business_id: campaign.business_id.clone(),
                campaign_id: campaign.id.clone(),
                issued_at: stamp.created_at,
            })
            .await;

        let count = self.ledger.count_unredeemed(user_id, &campaign.id).await?;
        let state = CardState::from_count(count, campaign.stamp_goal);

        if !state.is_complete() {
            debug!(
                user = %user_id,
                campaign = %campaign.id,
                count,
                goal = campaign.stamp_goal,
                "[sl-04] Stamp accrued"
            );
            return Ok(ScanResult {
                campaign_id: campaign.id.clone(),
                business_id: campaign.business_id.clone(),
                stamp_id: stamp.id,
                reward_earned: false,
                current_count: count,
                stamp_goal: campaign.stamp_goal,
                reward: None,
            });
        }

        // The ledger re-checks availability atomically
        let redemption = self
            .ledger
            .redeem_oldest(user_id, &campaign.id, campaign.stamp_goal)
            .await?;
        self.events
            .publish(LoyaltyEvent::StampsRedeemed {
                user_id: user_id.clone(),
                business_id: campaign.business_id.clone(),
                campaign_id: campaign.id.clone(),
                stamp_ids: redemption.stamp_ids.clone(),
                redeemed_at: redemption.redeemed_at,
            })
            .await;

        // Rollover: the next card starts at one. A stamp left over from the
        // previous seed (goal of 1) already is that first stamp.
        let mut current_count = self.ledger.count_unredeemed(user_id, &campaign.id).await?;
        if current_count == 0 {
            let seed = self
                .ledger
                .append_stamp(user_id, &campaign.business_id, &campaign.id, location)
                .await?;
            self.events
                .publish(LoyaltyEvent::StampIssued {
                    stamp_id: seed.id,
                    user_id: user_id.clone(),
                    business_id: campaign.business_id.clone(),
                    campaign_id: campaign.id.clone(),
                    issued_at: seed.created_at,
                })
                .await;
            current_count = self.ledger.count_unredeemed(user_id, &campaign.id).await?;
        }

        REWARDS_EARNED.inc();
        info!(
            user = %user_id,
            campaign = %campaign.id,
            redeemed = redemption.len(),
            current_count,
            "[sl-04] Reward earned, card rolled over"
        );

        self.events
            .publish(LoyaltyEvent::RewardEarned(RewardEarned {
                user_id: user_id.clone(),
                campaign_id: campaign.id.clone(),
                business_id: campaign.business_id.clone(),
                reward: campaign.reward.clone(),
                earned_at: redemption.redeemed_at,
            }))
            .await;

        Ok(ScanResult {
            campaign_id: campaign.id.clone(),
            business_id: campaign.business_id.clone(),
            stamp_id: stamp.id,
            reward_earned: true,
            current_count,
            stamp_goal: campaign.stamp_goal,
            reward: Some(campaign.reward.clone()),
        })
    }

    async fn process_scan(&self, request: ScanRequest) -> Result<ScanResult, ScanError> {
        let payload = decode_with_limit(&request.payload, self.config.max_payload_bytes)?;
        let campaign = self.resolve_campaign(&payload).await?;

        if campaign.location_required {
            self.check_proximity(&campaign, request.location.as_ref())
                .await?;
        }

        let _pair = if self.config.serialize_pairs {
            let key = LedgerKey::new(request.user_id.clone(), campaign.id.clone());
            Some(self.pair_locks.acquire(key).await)
        } else {
            None
        };

        self.accrue(&request.user_id, &campaign, request.location)
            .await
    }
}

/// Step 4: the claimed business must own the campaign.
fn ensure_owner(campaign: &Campaign, payload: &DecodedPayload) -> Result<(), ScanError> {
    if campaign.business_id == payload.business_id {
        return Ok(());
    }
    Err(ScanError::PayloadMismatch {
        campaign_id: campaign.id.clone(),
        owner: campaign.business_id.clone(),
        claimed: payload.business_id.clone(),
    })
}

#[async_trait]
impl CycleEngineApi for CycleEngineService {
    async fn handle_scan(&self, request: ScanRequest) -> Result<ScanResult, ScanError> {
        let _timer = time_histogram!(SCAN_DURATION);
        let user_id = request.user_id.clone();

        let result = self.process_scan(request).await;
        if let Err(err) = &result {
            SCANS_REJECTED.with_label_values(&[err.kind()]).inc();
            warn!(
                user = %user_id,
                kind = err.kind(),
                error = %err,
                "[sl-04] Scan rejected"
            );
        }
        result
    }

    async fn verify_payload(&self, payload: &str) -> Result<VerifiedPayload, ScanError> {
        let payload = decode_with_limit(payload, self.config.max_payload_bytes)?;

        let campaign = self
            .directory
            .get_campaign(&payload.campaign_id)
            .await?
            .ok_or_else(|| ScanError::CampaignNotFound(payload.campaign_id.clone()))?;
        ensure_owner(&campaign, &payload)?;

        let business = self
            .directory
            .get_business(&campaign.business_id)
            .await?
            .ok_or_else(|| ScanError::BusinessNotFound(campaign.business_id.clone()))?;

        Ok(VerifiedPayload {
            issuing: campaign.is_issuing(self.clock.now()),
            campaign_id: campaign.id,
            campaign_name: campaign.name,
            business_id: business.id,
            business_name: business.name,
            reward: campaign.reward,
            stamp_goal: campaign.stamp_goal,
            location_required: campaign.location_required,
        })
    }

    async fn list_joinable(&self, user_id: &UserId) -> Result<Vec<Campaign>, ScanError> {
        let held = self.ledger.count_unredeemed_by_campaign(user_id).await?;
        let now = self.clock.now();

        Ok(self
            .directory
            .list_campaigns()
            .await?
            .into_iter()
            .filter(|c| c.is_issuing(now) && !held.contains_key(&c.id))
            .collect())
    }

    async fn list_cards(&self, user_id: &UserId) -> Result<Vec<LoyaltyCard>, ScanError> {
        let held = self.ledger.count_unredeemed_by_campaign(user_id).await?;
        let mut cards = Vec::with_capacity(held.len());

        for (campaign_id, count) in held {
            let Some(campaign) = self.directory.get_campaign(&campaign_id).await? else {
                warn!(campaign = %campaign_id, "[sl-04] Stamps held for unknown campaign");
                continue;
            };
            let business_name = self
                .directory
                .get_business(&campaign.business_id)
                .await?
                .map(|b| b.name);

            cards.push(LoyaltyCard {
                state: CardState::from_count(count, campaign.stamp_goal),
                current_count: count,
                stamp_goal: campaign.stamp_goal,
                campaign_id: campaign.id,
                campaign_name: campaign.name,
                business_id: campaign.business_id,
                business_name,
                reward: campaign.reward,
            });
        }

        Ok(cards)
    }
}
