//! # SL-01: Geofence Validator
//!
//! Decides whether a customer is "at" a business.
//!
//! ## Architecture
//!
//! - **Domain**: haversine distance and the proximity predicate
//!
//! Everything here is pure and non-blocking: no I/O, no shared state, no
//! synchronization. A missing or invalid point always yields "not present".

pub mod domain;

pub use domain::distance::{haversine_distance_meters, EARTH_RADIUS_METERS};
pub use domain::proximity::{distance_if_known, is_within_proximity};
