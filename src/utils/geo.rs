use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees. Pure value type, no identity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the pair lies within [-90, 90] latitude and [-180, 180]
    /// longitude. Out-of-range values would still produce a finite
    /// Haversine result, just a meaningless one.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Calculate distance between two coordinates using the Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance_km(a: Coordinates, b: Coordinates) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat_a_rad = a.latitude.to_radians();
    let lat_b_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_gulshan_mirpur() {
        // Gulshan-1 to Mirpur-10, Dhaka
        let gulshan = Coordinates::new(23.7803, 90.4168);
        let mirpur = Coordinates::new(23.8260, 90.3800);

        let distance = haversine_distance_km(gulshan, mirpur);
        // Straight-line distance is about 6.3 km
        assert!(distance > 6.0 && distance < 6.6, "got {}", distance);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = Coordinates::new(23.7803, 90.4168);
        let b = Coordinates::new(-33.8688, 151.2093);

        let ab = haversine_distance_km(a, b);
        let ba = haversine_distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_identical_points() {
        let p = Coordinates::new(23.7803, 90.4168);
        assert_eq!(haversine_distance_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_antipodal() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);

        let distance = haversine_distance_km(a, b);
        // Half the Earth's circumference, ~20015 km
        assert!((distance - 20015.0).abs() < 1.0, "got {}", distance);
    }

    #[test]
    fn test_in_range() {
        assert!(Coordinates::new(23.78, 90.41).in_range());
        assert!(Coordinates::new(-90.0, 180.0).in_range());
        assert!(!Coordinates::new(91.0, 0.0).in_range());
        assert!(!Coordinates::new(0.0, -180.5).in_range());
    }
}
