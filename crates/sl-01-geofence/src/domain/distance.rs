//! Great-circle distance.

use shared_types::GeoPoint;

/// Equatorial earth radius in meters (WGS-84 semi-major axis).
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Haversine distance between two points, in meters.
///
/// Symmetric, zero for identical points, never negative.
pub fn haversine_distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}
