//! # Loyalty Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! - `container/` - Configuration, catalog loading and component wiring
//! - `commands` - JSON-lines command protocol
//! - `notifications` - Reward notification delivery
//! - `runtime` - Command loop and shutdown

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod container;
pub mod notifications;
pub mod runtime;

pub use commands::{Command, CommandError, CommandHandler, ErrorBody, Response};
pub use container::{Catalog, ConfigError, LoyaltyContainer, RuntimeConfig};
pub use notifications::RewardNotifier;
pub use runtime::LoyaltyRuntime;
