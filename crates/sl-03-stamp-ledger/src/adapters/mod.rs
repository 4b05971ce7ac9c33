//! Adapters (hexagonal architecture)

pub mod memory;
