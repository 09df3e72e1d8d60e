use crate::models::{BoundingBox, Coordinates, DistanceBasis, DistanceScore};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Step table mapping distance to points: `(upper bound exclusive, points)`.
/// Anything at or beyond the last bound scores `FAR_POINTS`.
const DISTANCE_BANDS: [(f64, f64); 6] = [
    (5.0, 30.0),
    (10.0, 25.0),
    (15.0, 20.0),
    (20.0, 15.0),
    (30.0, 10.0),
    (40.0, 5.0),
];
const FAR_POINTS: f64 = 2.0;

/// Maximum distance sub-score
pub const MAX_DISTANCE_POINTS: f64 = 30.0;

pub const SAME_CITY_POINTS: f64 = 25.0;
pub const OTHER_CITY_POINTS: f64 = 5.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinate pairs
#[inline]
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Calculate a bounding box around a center point
///
/// Used by the provider directory as a cheap radius pre-filter.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;
    let lon_delta = radius_km / (111.0 * lat.to_radians().cos().abs());

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Map a distance in km onto the step table. Lower bounds are inclusive,
/// so exactly 5.0 km lands in the 25-point band. NaN scores as far away.
#[inline]
pub fn distance_points(distance_km: f64) -> f64 {
    DISTANCE_BANDS
        .iter()
        .find(|(upper, _)| distance_km < *upper)
        .map(|(_, points)| *points)
        .unwrap_or(FAR_POINTS)
}

/// City-name fallback: case-insensitive exact match, surrounding whitespace ignored
#[inline]
pub fn same_city(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Score geographic proximity between a provider and a booking.
///
/// Uses coordinates when both sides have them, otherwise falls back to
/// comparing city names. Never excludes a candidate.
pub fn score_distance(
    provider_coords: Option<Coordinates>,
    booking_coords: Option<Coordinates>,
    provider_city: &str,
    booking_city: &str,
) -> DistanceScore {
    match (provider_coords, booking_coords) {
        (Some(provider), Some(booking)) => {
            let distance_km = distance_between(provider, booking);
            DistanceScore {
                points: distance_points(distance_km),
                basis: DistanceBasis::Geo { distance_km },
            }
        }
        _ => {
            let matched = same_city(provider_city, booking_city);
            DistanceScore {
                points: if matched { SAME_CITY_POINTS } else { OTHER_CITY_POINTS },
                basis: DistanceBasis::City { matched },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(40.7128, -74.0060, 10.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_band_lower_bounds_are_inclusive() {
        assert_eq!(distance_points(0.0), 30.0);
        assert_eq!(distance_points(4.999), 30.0);
        assert_eq!(distance_points(5.0), 25.0);
        assert_eq!(distance_points(10.0), 20.0);
        assert_eq!(distance_points(15.0), 15.0);
        assert_eq!(distance_points(20.0), 10.0);
        assert_eq!(distance_points(30.0), 5.0);
        assert_eq!(distance_points(40.0), 2.0);
        assert_eq!(distance_points(12_000.0), 2.0);
    }

    #[test]
    fn test_nan_distance_scores_as_far() {
        assert_eq!(distance_points(f64::NAN), FAR_POINTS);
    }

    #[test]
    fn test_points_never_increase_with_distance() {
        let mut previous = MAX_DISTANCE_POINTS;
        for step in 0..1000 {
            let points = distance_points(step as f64 * 0.1);
            assert!(points <= previous, "score rose at {} km", step as f64 * 0.1);
            previous = points;
        }
    }

    #[test]
    fn test_geo_basis_when_both_coordinates_present() {
        let booking = Coordinates::new(53.8008, -1.5491);
        let score = score_distance(Some(booking), Some(booking), "Leeds", "York");

        assert_eq!(score.points, 30.0);
        assert!(matches!(score.basis, DistanceBasis::Geo { distance_km } if distance_km < 0.01));
    }

    #[test]
    fn test_city_fallback() {
        let coords = Some(Coordinates::new(53.8008, -1.5491));

        let same = score_distance(None, coords, " leeds", "LEEDS ");
        assert_eq!(same.points, SAME_CITY_POINTS);
        assert_eq!(same.basis, DistanceBasis::City { matched: true });

        let other = score_distance(coords, None, "Leeds", "York");
        assert_eq!(other.points, OTHER_CITY_POINTS);
        assert_eq!(other.basis, DistanceBasis::City { matched: false });
    }
}
