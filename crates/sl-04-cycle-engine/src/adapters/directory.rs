//! In-memory campaign directory.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    Business, BusinessId, Campaign, CampaignId, CampaignValidationError, StorageError,
};
use tracing::debug;

use crate::ports::outbound::CampaignDirectory;

/// Businesses and campaigns held in process memory.
#[derive(Default)]
pub struct InMemoryCampaignDirectory {
    businesses: RwLock<BTreeMap<BusinessId, Business>>,
    campaigns: RwLock<BTreeMap<CampaignId, Campaign>>,
}

impl InMemoryCampaignDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a business.
    pub fn upsert_business(&self, business: Business) {
        debug!(business = %business.id, "[sl-04] Business registered");
        self.businesses.write().insert(business.id.clone(), business);
    }

    /// Insert or replace a campaign after structural validation.
    pub fn upsert_campaign(&self, campaign: Campaign) -> Result<(), CampaignValidationError> {
        campaign.validate()?;
        debug!(campaign = %campaign.id, business = %campaign.business_id, "[sl-04] Campaign registered");
        self.campaigns.write().insert(campaign.id.clone(), campaign);
        Ok(())
    }

    /// Build a directory from a catalog, rejecting the first invalid campaign.
    pub fn from_catalog(
        businesses: impl IntoIterator<Item = Business>,
        campaigns: impl IntoIterator<Item = Campaign>,
    ) -> Result<Self, CampaignValidationError> {
        let directory = Self::new();
        for business in businesses {
            directory.upsert_business(business);
        }
        for campaign in campaigns {
            directory.upsert_campaign(campaign)?;
        }
        Ok(directory)
    }

    pub fn campaign_count(&self) -> usize {
        self.campaigns.read().len()
    }
}

#[async_trait]
impl CampaignDirectory for InMemoryCampaignDirectory {
    async fn get_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, StorageError> {
        Ok(self.campaigns.read().get(id).cloned())
    }

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>, StorageError> {
        Ok(self.businesses.read().get(id).cloned())
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StorageError> {
        Ok(self.campaigns.read().values().cloned().collect())
    }
}
