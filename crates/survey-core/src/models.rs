//! Core data models for survey planning.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Square metres per international acre.
pub const SQ_METERS_PER_ACRE: f64 = 4_046.856_422_4;

/// Camera and airframe characteristics of a drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneProfile {
    pub id: String,
    pub name: String,
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub focal_length_mm: f64,
    pub image_width_px: u32,
    pub image_height_px: u32,
    pub max_flight_time_min: f64,
    pub cruise_speed_mps: f64,
    pub max_speed_mps: f64,
    /// Legal or airframe ceiling (AGL)
    pub max_altitude_m: f64,
    /// Position hold accuracy in meters
    #[serde(default)]
    pub hover_accuracy_m: f64,
}

impl DroneProfile {
    /// Check that every physical quantity is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sensor_width_mm", self.sensor_width_mm),
            ("sensor_height_mm", self.sensor_height_mm),
            ("focal_length_mm", self.focal_length_mm),
            ("image_width_px", self.image_width_px as f64),
            ("image_height_px", self.image_height_px as f64),
            ("max_flight_time_min", self.max_flight_time_min),
            ("cruise_speed_mps", self.cruise_speed_mps),
            ("max_speed_mps", self.max_speed_mps),
            ("max_altitude_m", self.max_altitude_m),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(name, value, "must be a positive number"));
            }
        }
        if self.cruise_speed_mps > self.max_speed_mps {
            return Err(Error::invalid(
                "cruise_speed_mps",
                self.cruise_speed_mps,
                format!("exceeds max speed {}", self.max_speed_mps),
            ));
        }
        if !self.hover_accuracy_m.is_finite() || self.hover_accuracy_m < 0.0 {
            return Err(Error::invalid(
                "hover_accuracy_m",
                self.hover_accuracy_m,
                "must be zero or positive",
            ));
        }
        Ok(())
    }

    pub fn megapixels(&self) -> f64 {
        (self.image_width_px as f64 * self.image_height_px as f64) / 1_000_000.0
    }
}

/// Options controlling image resolution and overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingParameters {
    /// Flight altitude AGL. `None` solves it from `target_gsd_cm`.
    #[serde(default)]
    pub altitude_m: Option<f64>,
    /// Overlap between consecutive photos along a line, percent
    pub forward_overlap_pct: f64,
    /// Overlap between adjacent lines, percent
    pub side_overlap_pct: f64,
    /// Requested ground sample distance in cm/px (ignored when altitude is set)
    pub target_gsd_cm: f64,
    /// Ground speed used instead of the profile's cruise speed
    #[serde(default)]
    pub speed_override_mps: Option<f64>,
    /// Camera pitch, -90 is straight down
    #[serde(default = "default_gimbal_pitch")]
    pub gimbal_pitch_deg: f64,
}

fn default_gimbal_pitch() -> f64 {
    -90.0
}

/// Overlap must lie in [0, 100); 100 or more is degenerate.
pub(crate) fn check_overlap(parameter: &'static str, overlap_pct: f64) -> Result<()> {
    if overlap_pct.is_nan() || overlap_pct < 0.0 {
        return Err(Error::invalid(parameter, overlap_pct, "overlap must be in [0, 100)"));
    }
    if overlap_pct >= 100.0 {
        return Err(Error::DegenerateOverlap {
            parameter,
            overlap_pct,
        });
    }
    Ok(())
}

impl Default for MappingParameters {
    fn default() -> Self {
        Self {
            altitude_m: None,
            forward_overlap_pct: 70.0,
            side_overlap_pct: 60.0,
            target_gsd_cm: 2.0,
            speed_override_mps: None,
            gimbal_pitch_deg: default_gimbal_pitch(),
        }
    }
}

impl MappingParameters {
    /// Validate every option up front, before any geometry is computed.
    ///
    /// Overlaps of exactly 100% or more are reported as `DegenerateOverlap`
    /// rather than `InvalidParameters` so callers can tell the two apart.
    pub fn validate(&self, drone: &DroneProfile) -> Result<()> {
        check_overlap("forward_overlap_pct", self.forward_overlap_pct)?;
        check_overlap("side_overlap_pct", self.side_overlap_pct)?;

        match self.altitude_m {
            Some(alt) => {
                if !alt.is_finite() || alt <= 0.0 {
                    return Err(Error::invalid("altitude_m", alt, "altitude must be positive"));
                }
                if alt > drone.max_altitude_m {
                    return Err(Error::invalid(
                        "altitude_m",
                        alt,
                        format!("exceeds {} ceiling of {} m", drone.id, drone.max_altitude_m),
                    ));
                }
            }
            None => {
                if !self.target_gsd_cm.is_finite() || self.target_gsd_cm <= 0.0 {
                    return Err(Error::invalid(
                        "target_gsd_cm",
                        self.target_gsd_cm,
                        "target GSD must be positive when altitude is not given",
                    ));
                }
            }
        }

        if let Some(speed) = self.speed_override_mps {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(Error::invalid("speed_override_mps", speed, "speed must be positive"));
            }
            if speed > drone.max_speed_mps {
                return Err(Error::invalid(
                    "speed_override_mps",
                    speed,
                    format!("exceeds {} max speed of {} m/s", drone.id, drone.max_speed_mps),
                ));
            }
        }

        if !(-90.0..=0.0).contains(&self.gimbal_pitch_deg) {
            return Err(Error::invalid(
                "gimbal_pitch_deg",
                self.gimbal_pitch_deg,
                "gimbal pitch must be within [-90, 0]",
            ));
        }

        Ok(())
    }

    /// Ground speed for this mission.
    pub fn effective_speed(&self, drone: &DroneProfile) -> f64 {
        self.speed_override_mps.unwrap_or(drone.cruise_speed_mps)
    }
}

/// Rectangular, north-aligned survey area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub center_lat: f64,
    pub center_lon: f64,
    /// East-west extent in meters
    pub width_m: f64,
    /// North-south extent in meters
    pub height_m: f64,
}

impl AreaOfInterest {
    pub fn new(center_lat: f64, center_lon: f64, width_m: f64, height_m: f64) -> Result<Self> {
        let area = Self {
            center_lat,
            center_lon,
            width_m,
            height_m,
        };
        area.validate()?;
        Ok(area)
    }

    /// Square area with `side = sqrt(area_m2)`.
    pub fn from_square_meters(center_lat: f64, center_lon: f64, area_m2: f64) -> Result<Self> {
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return Err(Error::invalid("area_m2", area_m2, "area must be positive"));
        }
        let side = area_m2.sqrt();
        Self::new(center_lat, center_lon, side, side)
    }

    pub fn from_acres(center_lat: f64, center_lon: f64, acres: f64) -> Result<Self> {
        if !acres.is_finite() || acres <= 0.0 {
            return Err(Error::invalid("area_acres", acres, "area must be positive"));
        }
        Self::from_square_meters(center_lat, center_lon, acres * SQ_METERS_PER_ACRE)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width_m.is_finite() || self.width_m <= 0.0 {
            return Err(Error::invalid("width_m", self.width_m, "width must be positive"));
        }
        if !self.height_m.is_finite() || self.height_m <= 0.0 {
            return Err(Error::invalid("height_m", self.height_m, "height must be positive"));
        }
        if !self.center_lat.is_finite() || self.center_lat.abs() >= 90.0 {
            return Err(Error::invalid(
                "center_lat",
                self.center_lat,
                "latitude must be within (-90, 90)",
            ));
        }
        if !self.center_lon.is_finite() || self.center_lon.abs() > 180.0 {
            return Err(Error::invalid(
                "center_lon",
                self.center_lon,
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(())
    }

    pub fn area_m2(&self) -> f64 {
        self.width_m * self.height_m
    }

    pub fn area_acres(&self) -> f64 {
        self.area_m2() / SQ_METERS_PER_ACRE
    }
}

/// What the drone does on reaching a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointAction {
    CapturePhoto,
    None,
}

/// A single point of the survey trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in the full generated sequence, starting at 0
    pub index: usize,
    /// Coverage line this waypoint belongs to
    pub line_index: usize,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub heading_deg: f64,
    pub action: WaypointAction,
    /// Along-path distance from the first waypoint
    pub distance_from_start_m: f64,
}

impl Waypoint {
    pub fn is_capture(&self) -> bool {
        self.action == WaypointAction::CapturePhoto
    }
}

/// A battery-bounded slice of the trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub segment_index: usize,
    pub waypoints: Vec<Waypoint>,
    pub estimated_duration_s: f64,
    pub photo_count: usize,
}

impl FlightSegment {
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Along-path distance flown between the first and last waypoint.
    pub fn distance_m(&self) -> f64 {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => last.distance_from_start_m - first.distance_from_start_m,
            _ => 0.0,
        }
    }
}

/// Ground area seen by one photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_m: f64,
    pub height_m: f64,
}

/// Altitude chosen for a mission and the resolution it yields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeResolution {
    pub altitude_m: f64,
    /// GSD actually achieved at `altitude_m`
    pub gsd_cm: f64,
    /// GSD asked for, if the altitude was solved from one
    pub requested_gsd_cm: Option<f64>,
    /// True when the solved altitude hit the profile ceiling
    pub clamped: bool,
}

/// Operator-facing totals for a planned mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub profile_id: String,
    pub drone_name: String,
    pub altitude_m: f64,
    pub gsd_cm: f64,
    pub altitude_clamped: bool,
    pub footprint: Footprint,
    pub line_spacing_m: f64,
    pub photo_spacing_m: f64,
    pub num_lines: usize,
    pub total_waypoints: usize,
    pub photo_count: usize,
    pub total_distance_m: f64,
    pub total_flight_time_s: f64,
    pub num_segments: usize,
    pub area_m2: f64,
    pub area_acres: f64,
    pub storage_required_gb: f64,
}

impl MissionSummary {
    pub fn total_flight_time_min(&self) -> f64 {
        self.total_flight_time_s / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileRegistry;

    fn drone() -> DroneProfile {
        ProfileRegistry::builtin()
            .get("generic")
            .expect("builtin generic profile")
            .clone()
    }

    #[test]
    fn test_area_from_square_meters_uses_square_root() {
        let area = AreaOfInterest::from_square_meters(40.0, -74.0, 160_000.0).unwrap();
        assert!((area.width_m - 400.0).abs() < 1e-9);
        assert!((area.height_m - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_from_acres() {
        let area = AreaOfInterest::from_acres(40.0, -74.0, 10.0).unwrap();
        assert!((area.area_m2() - 40_468.564_224).abs() < 1e-6);
        assert!((area.area_acres() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_rejects_non_positive_dimensions() {
        assert!(matches!(
            AreaOfInterest::new(40.0, -74.0, 0.0, 100.0),
            Err(Error::InvalidParameters { parameter: "width_m", .. })
        ));
        assert!(matches!(
            AreaOfInterest::new(40.0, -74.0, 100.0, -5.0),
            Err(Error::InvalidParameters { parameter: "height_m", .. })
        ));
        assert!(AreaOfInterest::from_acres(40.0, -74.0, 0.0).is_err());
    }

    #[test]
    fn test_params_overlap_bounds() {
        let drone = drone();
        let mut params = MappingParameters::default();
        assert!(params.validate(&drone).is_ok());

        params.side_overlap_pct = 100.0;
        assert!(matches!(
            params.validate(&drone),
            Err(Error::DegenerateOverlap { parameter: "side_overlap_pct", .. })
        ));

        params.side_overlap_pct = -1.0;
        assert!(matches!(
            params.validate(&drone),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_params_reject_altitude_above_ceiling() {
        let drone = drone();
        let params = MappingParameters {
            altitude_m: Some(drone.max_altitude_m + 1.0),
            ..MappingParameters::default()
        };
        assert!(matches!(
            params.validate(&drone),
            Err(Error::InvalidParameters { parameter: "altitude_m", .. })
        ));
    }

    #[test]
    fn test_params_speed_override() {
        let drone = drone();
        let mut params = MappingParameters::default();
        assert_eq!(params.effective_speed(&drone), drone.cruise_speed_mps);

        params.speed_override_mps = Some(5.0);
        assert_eq!(params.effective_speed(&drone), 5.0);

        params.speed_override_mps = Some(drone.max_speed_mps * 2.0);
        assert!(params.validate(&drone).is_err());
    }

    #[test]
    fn test_segment_distance_spans_first_to_last() {
        let wp = |index: usize, distance_from_start_m: f64| Waypoint {
            index,
            line_index: 0,
            lat: 40.0,
            lon: -74.0,
            altitude_m: 70.0,
            heading_deg: 0.0,
            action: WaypointAction::CapturePhoto,
            distance_from_start_m,
        };
        let segment = FlightSegment {
            segment_index: 1,
            waypoints: vec![wp(10, 150.0), wp(11, 157.7), wp(12, 165.4)],
            estimated_duration_s: 0.0,
            photo_count: 3,
        };
        assert!((segment.distance_m() - 15.4).abs() < 1e-9);
    }
}
