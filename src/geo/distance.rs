//! Great-circle distance

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::geo::GeoPoint;
use std::f64::consts::PI;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// Deterministic and symmetric; `haversine_distance(p, p)` is exactly zero.
pub fn haversine_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.lat * PI / 180.0;
    let lat2 = p2.lat * PI / 180.0;
    let delta_lat = (p2.lat - p1.lat) * PI / 180.0;
    let delta_lon = (p2.lon - p1.lon) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

/// Distance rounded to whole meters
pub fn distance_meters(p1: GeoPoint, p2: GeoPoint) -> u32 {
    haversine_distance(p1, p2).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(p, p), 0.0);
        assert_eq!(distance_meters(p, p), 0);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(40.7128, -74.0060);
        let b = GeoPoint::new(34.0522, -118.2437);
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[test]
    fn test_known_distance() {
        // London to Paris is roughly 343.5 km
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        assert_relative_eq!(haversine_distance(london, paris), 343_500.0, max_relative = 0.01);
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        assert_relative_eq!(haversine_distance(a, b), 111_195.0, max_relative = 0.001);
    }

    #[test]
    fn test_antipodal_points() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        assert_relative_eq!(haversine_distance(a, b), PI * EARTH_RADIUS_METERS, max_relative = 1e-9);
    }
}
