//! Adapters (hexagonal architecture)

pub mod directory;
