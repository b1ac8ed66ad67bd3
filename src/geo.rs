//! Great-circle distance between coordinates

use crate::models::Coordinate;

use std::f64::consts::PI;

/// Mean earth radius used by `haversine::Units::Kilometers`
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers on a sphere of radius 6371 km.
///
/// Near-antipodal pairs can round the haversine term above 1, which makes the
/// crate return NaN; those pairs are half a circumference apart.
#[must_use]
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let km = haversine::distance(from.into(), to.into(), haversine::Units::Kilometers);
    if km.is_nan() { PI * EARTH_RADIUS_KM } else { km }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let munich = coord(48.137_154, 11.576_124);
        assert!(distance(munich, munich).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (coord(48.137_154, 11.576_124), coord(48.370_545, 10.897_790)),
            (coord(-33.8688, 151.2093), coord(51.5074, -0.1278)),
            (coord(89.9, -179.9), coord(-89.9, 179.9)),
        ];
        for (a, b) in pairs {
            assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
            assert!(distance(a, b) >= 0.0);
        }
    }

    #[test]
    fn test_known_distance() {
        // Munich to Augsburg is roughly 57 km as the crow flies
        let munich = coord(48.137_154, 11.576_124);
        let augsburg = coord(48.370_545, 10.897_790);
        let km = distance(munich, augsburg);
        assert!((km - 56.6).abs() < 1.5, "got {km}");
    }

    #[test]
    fn test_antipodal_distance_is_half_circumference() {
        let half = PI * EARTH_RADIUS_KM;
        for (a, b) in [
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(48.137_154, 11.576_124), coord(-48.137_154, -168.423_876)),
            (coord(90.0, 0.0), coord(-90.0, 0.0)),
        ] {
            let km = distance(a, b);
            assert!(km.is_finite());
            assert!((km - half).abs() < 1.0, "got {km}");
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 6371 km * pi / 180
        let km = distance(coord(0.0, 0.0), coord(1.0, 0.0));
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }
}
