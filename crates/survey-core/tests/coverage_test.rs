//! Coverage guarantees of generated survey grids.

use survey_core::spatial::geodetic_to_local;
use survey_core::{
    compute_footprint, generate_grid_pattern, plan_grid_geometry, AreaOfInterest, DroneProfile,
    MappingParameters, Waypoint,
};

fn drone() -> DroneProfile {
    DroneProfile {
        id: "survey_quad".to_string(),
        name: "Survey Quad".to_string(),
        sensor_width_mm: 13.2,
        sensor_height_mm: 8.8,
        focal_length_mm: 8.8,
        image_width_px: 5472,
        image_height_px: 3648,
        max_flight_time_min: 30.0,
        cruise_speed_mps: 10.0,
        max_speed_mps: 20.0,
        max_altitude_m: 120.0,
        hover_accuracy_m: 0.3,
    }
}

fn local_captures(area: &AreaOfInterest, waypoints: &[Waypoint]) -> Vec<(usize, f64, f64)> {
    waypoints
        .iter()
        .filter(|wp| wp.is_capture())
        .map(|wp| {
            let p = geodetic_to_local(area.center_lat, area.center_lon, wp.lat, wp.lon);
            (wp.line_index, p.x, p.y)
        })
        .collect()
}

fn assert_full_coverage(area: AreaOfInterest, params: MappingParameters) {
    let drone = drone();
    let waypoints = generate_grid_pattern(&area, &drone, &params).unwrap();
    let geometry = plan_grid_geometry(&area, &drone, &params).unwrap();
    let fp = compute_footprint(geometry.resolution.altitude_m, &drone);
    let captures = local_captures(&area, &waypoints);

    let half_w = fp.width_m / 2.0 + 1e-6;
    let half_h = fp.height_m / 2.0 + 1e-6;

    // Sample the nominal rectangle including its boundary.
    let steps = 40;
    for i in 0..=steps {
        for j in 0..=steps {
            let x = -area.width_m / 2.0 + area.width_m * i as f64 / steps as f64;
            let y = -area.height_m / 2.0 + area.height_m * j as f64 / steps as f64;
            let covered = captures.iter().any(|&(_, cx, cy)| {
                (x - cx).abs() <= half_w && (y - cy).abs() <= half_h
            });
            assert!(covered, "point ({x:.2}, {y:.2}) not covered");
        }
    }
}

#[test]
fn test_square_area_fully_covered() {
    let area = AreaOfInterest::from_acres(33.6846, -117.8265, 20.0).unwrap();
    assert_full_coverage(area, MappingParameters::default());
}

#[test]
fn test_rectangular_area_fully_covered_without_overlap() {
    let area = AreaOfInterest::new(-33.86, 151.21, 523.0, 187.0).unwrap();
    let params = MappingParameters {
        altitude_m: Some(60.0),
        forward_overlap_pct: 0.0,
        side_overlap_pct: 0.0,
        ..MappingParameters::default()
    };
    assert_full_coverage(area, params);
}

#[test]
fn test_high_latitude_area_fully_covered() {
    let area = AreaOfInterest::new(64.13, -21.9, 300.0, 450.0).unwrap();
    let params = MappingParameters {
        altitude_m: Some(90.0),
        forward_overlap_pct: 80.0,
        side_overlap_pct: 70.0,
        ..MappingParameters::default()
    };
    assert_full_coverage(area, params);
}

#[test]
fn test_configured_overlap_achieved_on_both_axes() {
    let area = AreaOfInterest::new(40.0, -105.0, 400.0, 300.0).unwrap();
    let params = MappingParameters {
        altitude_m: Some(80.0),
        forward_overlap_pct: 75.0,
        side_overlap_pct: 65.0,
        ..MappingParameters::default()
    };
    let drone = drone();
    let waypoints = generate_grid_pattern(&area, &drone, &params).unwrap();
    let fp = compute_footprint(80.0, &drone);
    let captures = local_captures(&area, &waypoints);

    // Forward: consecutive photos on the same line.
    for pair in captures.windows(2) {
        let (line_a, xa, ya) = pair[0];
        let (line_b, xb, yb) = pair[1];
        if line_a != line_b {
            continue;
        }
        assert!((xa - xb).abs() < 1e-6);
        let overlap = 1.0 - (ya - yb).abs() / fp.height_m;
        assert!(overlap >= 0.75 - 1e-6, "forward overlap {overlap}");
    }

    // Side: x positions of adjacent lines.
    let mut line_x: Vec<(usize, f64)> = Vec::new();
    for &(line, x, _) in &captures {
        if line_x.last().map(|&(l, _)| l) != Some(line) {
            line_x.push((line, x));
        }
    }
    for pair in line_x.windows(2) {
        let overlap = 1.0 - (pair[1].1 - pair[0].1) / fp.width_m;
        assert!(overlap >= 0.65 - 1e-6, "side overlap {overlap}");
    }
}
