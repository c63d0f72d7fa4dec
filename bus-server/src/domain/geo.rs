//! Geographic coordinates and great-circle distance.

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other` in coordinate space.
    ///
    /// A `ratio` of 0 returns `self`, 1 returns `other`. This is not a
    /// great-circle interpolation; it is only meant for the short hops
    /// between neighbouring stops.
    pub fn lerp(self, other: Coordinate, ratio: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * ratio,
            lng: self.lng + (other.lng - self.lng) * ratio,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(self, other: Coordinate) -> f64 {
        haversine_km(self, other)
    }

    /// The `[lng, lat]` pair used by GeoJSON.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Great-circle distance between two points in kilometres (haversine).
///
/// Deltas are taken as absolute values so the result is bit-for-bit
/// symmetric in its arguments.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lng = (b.lng - a.lng).abs().to_radians();

    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(43.3183, -1.9812);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn known_distance() {
        // One degree of latitude along a meridian is ~111.19 km.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = haversine_km(a, b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn short_urban_hop() {
        // Two stops roughly 500 m apart in Donostia.
        let a = Coordinate::new(43.3183, -1.9812);
        let b = Coordinate::new(43.3213, -1.9760);
        let d = a.distance_km(b);
        assert!(d > 0.4 && d < 0.6, "got {d}");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Coordinate::new(43.0, -2.0);
        let b = Coordinate::new(44.0, -1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Coordinate::new(43.5, -1.5));
    }

    #[test]
    fn lng_lat_order() {
        assert_eq!(Coordinate::new(43.3, -1.9).to_lng_lat(), [-1.9, 43.3]);
    }
}
