//! Spatial math for converting survey-local offsets to geographic coordinates.
//!
//! Survey areas span at most a few kilometres, so the planner works in a local
//! east/north metric frame centred on the area and converts with an
//! equirectangular approximation.

/// Meters per degree of latitude used by the equirectangular projection.
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point in the survey-local frame, meters from the area center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    /// Positive = east
    pub x: f64,
    /// Positive = north
    pub y: f64,
}

impl LocalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Planar Euclidean distance in meters.
    pub fn distance_to(&self, other: &LocalPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Meters per degree of longitude at `lat_deg`.
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    METERS_PER_DEG_LAT * lat_deg.to_radians().cos()
}

/// Convert a local offset to (lat, lon) around `center_lat`, `center_lon`.
///
/// `Δlat = Δy / 111320`, `Δlon = Δx / (111320 · cos(center_lat))`.
pub fn local_to_geodetic(center_lat: f64, center_lon: f64, point: LocalPoint) -> (f64, f64) {
    let lat = center_lat + point.y / METERS_PER_DEG_LAT;
    let lon = center_lon + point.x / meters_per_deg_lon(center_lat);
    (lat, lon)
}

/// Inverse of [`local_to_geodetic`].
pub fn geodetic_to_local(center_lat: f64, center_lon: f64, lat: f64, lon: f64) -> LocalPoint {
    LocalPoint {
        x: (lon - center_lon) * meters_per_deg_lon(center_lat),
        y: (lat - center_lat) * METERS_PER_DEG_LAT,
    }
}

/// Calculate distance between two points in meters using Haversine formula.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_local_round_trip() {
        let (lat, lon) = local_to_geodetic(40.7128, -74.006, LocalPoint::new(250.0, -125.0));
        let back = geodetic_to_local(40.7128, -74.006, lat, lon);
        assert!((back.x - 250.0).abs() < 1e-6);
        assert!((back.y + 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_equirectangular_matches_haversine_over_short_range() {
        let (lat, lon) = local_to_geodetic(33.6846, -117.8265, LocalPoint::new(300.0, 400.0));
        let dist = haversine_distance(33.6846, -117.8265, lat, lon);
        // 500 m planar; the two earth models differ by well under a percent
        assert!((dist - 500.0).abs() < 5.0, "got {dist}");
    }
}
