//! Proximity predicate.

use shared_types::GeoPoint;

use super::distance::haversine_distance_meters;

/// Distance between the two points, or `None` if either is missing or invalid.
pub fn distance_if_known(user: Option<&GeoPoint>, business: Option<&GeoPoint>) -> Option<f64> {
    match (user, business) {
        (Some(u), Some(b)) if u.is_valid() && b.is_valid() => Some(haversine_distance_meters(u, b)),
        _ => None,
    }
}

/// `true` when the user is within `threshold_meters` of the business.
///
/// Fails closed: a missing or invalid point, or a non-finite threshold,
/// yields `false`. A point exactly at the threshold distance is inside.
pub fn is_within_proximity(
    user: Option<&GeoPoint>,
    business: Option<&GeoPoint>,
    threshold_meters: f64,
) -> bool {
    if !threshold_meters.is_finite() {
        return false;
    }
    distance_if_known(user, business).is_some_and(|d| d <= threshold_meters)
}
