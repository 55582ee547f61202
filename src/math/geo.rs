//! Great-circle distance on a spherical Earth.

use crate::domain::LatLon;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees.
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DALLAS: LatLon = LatLon { lat: 32.78, lon: -96.80 };
    const DENVER: LatLon = LatLon { lat: 39.74, lon: -104.99 };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(DALLAS, DALLAS), 0.0);
        assert_eq!(haversine_km(DENVER, DENVER), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (DALLAS, DENVER),
            (LatLon::new(40.7128, -74.0060), LatLon::new(34.0522, -118.2437)),
            (LatLon::new(-33.86, 151.21), LatLon::new(51.51, -0.13)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine_km(a, b), haversine_km(b, a));
        }
    }

    #[test]
    fn dallas_to_denver() {
        assert_relative_eq!(haversine_km(DALLAS, DENVER), 1065.89, epsilon = 0.01);
    }

    #[test]
    fn quarter_meridian() {
        // Equator to pole is a quarter of the circumference.
        let d = haversine_km(LatLon::new(0.0, 0.0), LatLon::new(90.0, 0.0));
        assert_relative_eq!(d, std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM, epsilon = 1e-9);
    }
}
