//! # Service Container
//!
//! Central container holding the wired component instances.
//!
//! ## Initialization Order
//!
//! ```text
//! catalog ─→ directory
//! store ─→ ledger service
//! event bus
//! directory + ledger + bus ─→ cycle engine
//! ```

pub mod catalog;
pub mod config;
pub mod services;

pub use catalog::Catalog;
pub use config::{ConfigError, RuntimeConfig};
pub use services::LoyaltyContainer;
