//! # SL-04: Cycle Engine
//!
//! Orchestrates a single scan: validate, append, recount, and when the goal
//! is reached redeem and roll over to a fresh card in the same operation.
//!
//! ## Architecture
//!
//! - **Domain**: `CardState` (derived, never stored), scan request/result, `ScanError`
//! - **Ports**: Inbound (`CycleEngineApi`) and Outbound (`CampaignDirectory`)
//! - **Application**: `CycleEngineService`, per-pair serialization (`PairLocks`)
//! - **Adapters**: `InMemoryCampaignDirectory`
//!
//! ## Scan Pipeline
//!
//! ```text
//! payload ─→ decode ─→ campaign ─→ active? ─→ owner == bid? ─→ geofence?
//!                                                                   │
//!              ┌────────────────────── pair lock ───────────────────┘
//!              ↓
//!           append ─→ recount ─→ count < goal ─→ progress
//!                                   │
//!                                   └─→ redeem oldest `goal` ─→ seed stamp ─→ RewardEarned
//! ```
//!
//! Steps before the lock are validation and never mutate anything.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::directory::InMemoryCampaignDirectory;
pub use application::pair_lock::{PairGuard, PairLocks};
pub use application::service::CycleEngineService;
pub use config::EngineConfig;
pub use domain::errors::ScanError;
pub use domain::scan::{ScanRequest, ScanResult, VerifiedPayload};
pub use domain::state::{derive_state, CardState, LoyaltyCard};
pub use ports::inbound::CycleEngineApi;
pub use ports::outbound::CampaignDirectory;
