//! Outbound Ports (Driven Ports / SPI)
//!
//! The ledger (`StampLedgerApi`) and the event bus (`EventPublisher`) are
//! consumed through their own crates' traits. Only the catalog lookup is
//! defined here.

use async_trait::async_trait;
use shared_types::{Business, BusinessId, Campaign, CampaignId, StorageError};

/// Read access to businesses and campaigns.
///
/// Implementations return owned snapshots; the engine never mutates them.
#[async_trait]
pub trait CampaignDirectory: Send + Sync {
    async fn get_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, StorageError>;

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>, StorageError>;

    /// Every campaign, active or not.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StorageError>;
}
