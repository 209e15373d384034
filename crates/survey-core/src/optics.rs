//! Camera geometry: altitude, ground footprint and ground sample distance.

use crate::error::Result;
use crate::models::{AltitudeResolution, DroneProfile, Footprint, MappingParameters};

/// Ground area covered by one photo at `altitude_m`.
pub fn compute_footprint(altitude_m: f64, drone: &DroneProfile) -> Footprint {
    Footprint {
        width_m: drone.sensor_width_mm * altitude_m / drone.focal_length_mm,
        height_m: drone.sensor_height_mm * altitude_m / drone.focal_length_mm,
    }
}

/// Ground sample distance in cm/px at `altitude_m`.
pub fn compute_gsd(altitude_m: f64, drone: &DroneProfile) -> f64 {
    drone.sensor_width_mm * altitude_m * 100.0
        / (drone.focal_length_mm * drone.image_width_px as f64)
}

/// Altitude that yields `target_gsd_cm`, clamped to the profile ceiling.
///
/// When clamped, `gsd_cm` is the (finer) GSD actually reached at the ceiling
/// and `clamped` is set so callers can report the difference.
pub fn resolve_altitude(target_gsd_cm: f64, drone: &DroneProfile) -> AltitudeResolution {
    let solved = target_gsd_cm * drone.focal_length_mm * drone.image_width_px as f64
        / (drone.sensor_width_mm * 100.0);

    if solved > drone.max_altitude_m {
        let achieved = compute_gsd(drone.max_altitude_m, drone);
        tracing::warn!(
            profile = %drone.id,
            requested_gsd_cm = target_gsd_cm,
            achieved_gsd_cm = achieved,
            solved_altitude_m = solved,
            max_altitude_m = drone.max_altitude_m,
            "Target GSD needs altitude above ceiling; clamping"
        );
        return AltitudeResolution {
            altitude_m: drone.max_altitude_m,
            gsd_cm: achieved,
            requested_gsd_cm: Some(target_gsd_cm),
            clamped: true,
        };
    }

    AltitudeResolution {
        altitude_m: solved,
        gsd_cm: compute_gsd(solved, drone),
        requested_gsd_cm: Some(target_gsd_cm),
        clamped: false,
    }
}

/// Altitude for a mission: explicit if given, otherwise solved from target GSD.
pub fn resolve_mapping_altitude(
    params: &MappingParameters,
    drone: &DroneProfile,
) -> Result<AltitudeResolution> {
    params.validate(drone)?;
    let resolution = match params.altitude_m {
        Some(altitude_m) => AltitudeResolution {
            altitude_m,
            gsd_cm: compute_gsd(altitude_m, drone),
            requested_gsd_cm: None,
            clamped: false,
        },
        None => resolve_altitude(params.target_gsd_cm, drone),
    };
    tracing::debug!(
        altitude_m = resolution.altitude_m,
        gsd_cm = resolution.gsd_cm,
        clamped = resolution.clamped,
        "Resolved mapping altitude"
    );
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn phantom_24mm() -> DroneProfile {
        DroneProfile {
            id: "test".to_string(),
            name: "Test".to_string(),
            sensor_width_mm: 13.2,
            sensor_height_mm: 8.8,
            focal_length_mm: 24.0,
            image_width_px: 5472,
            image_height_px: 3648,
            max_flight_time_min: 25.0,
            cruise_speed_mps: 8.0,
            max_speed_mps: 15.0,
            max_altitude_m: 120.0,
            hover_accuracy_m: 0.5,
        }
    }

    #[test]
    fn test_footprint_at_70m() {
        let fp = compute_footprint(70.0, &phantom_24mm());
        assert!((fp.width_m - 38.5).abs() < 1e-9);
        assert!((fp.height_m - 25.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_gsd_formula() {
        let drone = phantom_24mm();
        let gsd = compute_gsd(70.0, &drone);
        let expected = 13.2 * 70.0 * 100.0 / (24.0 * 5472.0);
        assert!((gsd - expected).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_altitude_round_trips_gsd() {
        let drone = phantom_24mm();
        for target in [0.2, 0.5, 0.7, 1.0] {
            let res = resolve_altitude(target, &drone);
            assert!(!res.clamped, "target {target} should not clamp");
            let gsd = compute_gsd(res.altitude_m, &drone);
            assert!(((gsd - target) / target).abs() < 0.01);
        }
    }

    #[test]
    fn test_resolve_altitude_clamps_to_ceiling() {
        let drone = phantom_24mm();
        // 5 cm/px would need ~2 km of altitude with a 24 mm lens.
        let res = resolve_altitude(5.0, &drone);
        assert!(res.clamped);
        assert_eq!(res.altitude_m, drone.max_altitude_m);
        assert!(res.gsd_cm < 5.0);
        assert_eq!(res.requested_gsd_cm, Some(5.0));
    }

    #[test]
    fn test_explicit_altitude_derives_gsd() {
        let drone = phantom_24mm();
        let params = MappingParameters {
            altitude_m: Some(70.0),
            target_gsd_cm: 99.0,
            ..MappingParameters::default()
        };
        let res = resolve_mapping_altitude(&params, &drone).unwrap();
        assert_eq!(res.altitude_m, 70.0);
        assert!((res.gsd_cm - compute_gsd(70.0, &drone)).abs() < 1e-12);
        assert_eq!(res.requested_gsd_cm, None);
    }

    #[test]
    fn test_non_positive_altitude_rejected() {
        let drone = phantom_24mm();
        let params = MappingParameters {
            altitude_m: Some(0.0),
            ..MappingParameters::default()
        };
        assert!(matches!(
            resolve_mapping_altitude(&params, &drone),
            Err(Error::InvalidParameters { parameter: "altitude_m", .. })
        ));
    }
}
