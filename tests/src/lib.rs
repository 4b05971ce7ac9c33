//! # Stamp-Loyalty Test Suite
//!
//! Cross-component tests that wire the real geofence, codec, ledger and
//! engine together. Per-crate unit and property tests live in each crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs   # Shared catalog and wiring
//!     ├── scenarios.rs  # Acceptance scenarios (rollover, geofence, mismatch, races)
//!     └── flows.rs      # Multi-step user journeys and bus delivery
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sl-tests
//! cargo test -p sl-tests integration::scenarios::
//! ```

pub mod integration;
