//! # SL-03: Stamp Ledger
//!
//! The append-only record of stamp grants and redemptions.
//!
//! ## Architecture
//!
//! - **Domain**: `LedgerKey`, `Redemption`, `RedeemOutcome`, `LedgerError`
//! - **Ports**: Inbound (`StampLedgerApi`) and Outbound (`StampStore`)
//! - **Application**: `StampLedgerService` (clock, logging, metrics)
//! - **Adapters**: `InMemoryStampStore`
//!
//! ## Invariants
//!
//! - Rows are never deleted. The only mutation is `redeemed: false -> true`.
//! - Progress is `count(unredeemed)` for a (user, campaign) pair, computed on
//!   every read. No running total is stored anywhere.
//! - `redeem_oldest` is all-or-nothing: it flips exactly `n` rows, oldest
//!   first by `(created_at, insertion order)`, or none at all.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use adapters::memory::InMemoryStampStore;
pub use application::service::StampLedgerService;
pub use domain::entities::{LedgerKey, RedeemOutcome, Redemption};
pub use domain::errors::LedgerError;
pub use ports::inbound::StampLedgerApi;
pub use ports::outbound::StampStore;
