//! # Shared Types Crate
//!
//! Domain entities used by every loyalty component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Campaign, Business and Stamp are defined here
//!   once; component crates never redefine them.
//! - **Immutable Snapshots**: Campaign and Business values are passed into the
//!   engine as owned snapshots. The only mutable record is the stamp ledger,
//!   and it is only mutated through the ledger's atomic operations.
//! - **Infrastructure vs Domain Errors**: `StorageError` is the single error
//!   type adapters return for connectivity and corruption failures, so callers
//!   can tell "your scan was invalid" from "the system is unavailable".

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp};
