//! Domain layer for the geofence validator.

pub mod distance;
pub mod proximity;
