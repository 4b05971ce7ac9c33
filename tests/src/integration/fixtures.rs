//! Shared wiring for integration tests.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use shared_bus::InMemoryEventBus;
use shared_types::{Business, Campaign, GeoPoint, ManualTimeSource, TimeSource};
use sl_03_stamp_ledger::{InMemoryStampStore, StampLedgerApi, StampLedgerService};
use sl_04_cycle_engine::{CycleEngineService, EngineConfig, InMemoryCampaignDirectory};

/// Storefront of the location-gated business.
pub const STOREFRONT: GeoPoint = GeoPoint {
    latitude: 40.7128,
    longitude: -74.0060,
};

pub struct Harness {
    pub clock: Arc<ManualTimeSource>,
    pub ledger: Arc<StampLedgerService>,
    pub events: Arc<InMemoryEventBus>,
    pub engine: Arc<CycleEngineService>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));
        let directory = Arc::new(
            InMemoryCampaignDirectory::from_catalog(businesses(), campaigns()).unwrap(),
        );
        let ledger = Arc::new(StampLedgerService::with_clock(
            Arc::new(InMemoryStampStore::new()),
            clock.clone(),
        ));
        let events = Arc::new(InMemoryEventBus::new());
        let engine = Arc::new(
            CycleEngineService::new(directory, ledger.clone(), events.clone())
                .with_config(config)
                .with_clock(clock.clone()),
        );
        Self {
            clock,
            ledger,
            events,
            engine,
        }
    }

    /// Pre-load `n` stamps for a pair, one minute apart.
    pub async fn seed(&self, user: &str, campaign: &str, business: &str, n: u32) {
        for _ in 0..n {
            self.ledger
                .append_stamp(&user.into(), &business.into(), &campaign.into(), None)
                .await
                .unwrap();
            self.tick();
        }
    }

    pub fn tick(&self) {
        self.clock.advance(Duration::minutes(1));
    }

    pub fn now(&self) -> chrono::DateTime<Utc> {
        self.clock.now()
    }
}

fn businesses() -> Vec<Business> {
    vec![
        Business {
            id: "cafe".into(),
            name: "Corner Cafe".into(),
            location: Some(STOREFRONT),
        },
        Business {
            id: "bakery".into(),
            name: "Bakery".into(),
            location: None,
        },
    ]
}

fn campaigns() -> Vec<Campaign> {
    vec![
        Campaign::new("coffee", "cafe", "Coffee Club", 5, "Free coffee"),
        Campaign::new("geo", "cafe", "Walk-in Club", 3, "Free muffin").with_location_required(100.0),
        Campaign::new("bread", "bakery", "Bread Club", 2, "Free loaf"),
    ]
}
