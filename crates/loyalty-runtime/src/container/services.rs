//! Wired component instances.

use std::sync::Arc;

use shared_bus::InMemoryEventBus;
use sl_03_stamp_ledger::{InMemoryStampStore, StampLedgerService};
use sl_04_cycle_engine::{CycleEngineService, InMemoryCampaignDirectory};
use tracing::info;

use super::catalog::Catalog;
use super::config::{ConfigError, RuntimeConfig};

/// Container holding every component of the loyalty runtime.
pub struct LoyaltyContainer {
    pub config: RuntimeConfig,
    pub directory: Arc<InMemoryCampaignDirectory>,
    pub ledger: Arc<StampLedgerService>,
    pub events: Arc<InMemoryEventBus>,
    pub engine: Arc<CycleEngineService>,
}

impl LoyaltyContainer {
    /// Wire the components around an already loaded catalog.
    pub fn new(config: RuntimeConfig, catalog: Catalog) -> Result<Self, ConfigError> {
        let directory = Arc::new(InMemoryCampaignDirectory::from_catalog(
            catalog.businesses,
            catalog.campaigns,
        )?);
        let ledger = Arc::new(StampLedgerService::new(Arc::new(InMemoryStampStore::new())));
        let events = Arc::new(InMemoryEventBus::new());
        let engine = Arc::new(
            CycleEngineService::new(directory.clone(), ledger.clone(), events.clone())
                .with_config(config.engine.clone()),
        );

        info!(
            campaigns = directory.campaign_count(),
            serialize_pairs = config.engine.serialize_pairs,
            "Loyalty container initialized"
        );

        Ok(Self {
            config,
            directory,
            ledger,
            events,
            engine,
        })
    }

    /// Load the configured catalog (or the demo catalog) and wire everything.
    pub fn from_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => {
                info!("No SL_CATALOG_PATH set, using demo catalog");
                Catalog::demo()
            }
        };
        Self::new(config, catalog)
    }
}
