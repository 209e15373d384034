//! Human-readable mission reports.

use survey_core::{DroneProfile, FlightSegment, MissionSummary};

const RULE: &str = "============================================================";

pub fn summary_lines(summary: &MissionSummary) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        "SURVEY MISSION SUMMARY".to_string(),
        RULE.to_string(),
        format!("Drone: {} ({})", summary.drone_name, summary.profile_id),
        format!(
            "Area: {:.1} acres ({:.0} m²)",
            summary.area_acres, summary.area_m2
        ),
        format!("Altitude: {:.1} m AGL", summary.altitude_m),
        format!("Ground resolution: {:.2} cm/px", summary.gsd_cm),
    ];
    if summary.altitude_clamped {
        lines.push(
            "  WARNING: target GSD needs more altitude than the drone allows; altitude clamped"
                .to_string(),
        );
    }
    lines.extend([
        format!(
            "Photo footprint: {:.1} x {:.1} m",
            summary.footprint.width_m, summary.footprint.height_m
        ),
        format!(
            "Line spacing: {:.1} m, photo spacing: {:.1} m",
            summary.line_spacing_m, summary.photo_spacing_m
        ),
        format!("Flight lines: {}", summary.num_lines),
        format!("Total waypoints: {}", summary.total_waypoints),
        format!("Estimated photos: {}", summary.photo_count),
        format!("Total distance: {:.0} m", summary.total_distance_m),
        format!("Estimated flight time: {:.1} min", summary.total_flight_time_min()),
        format!("Flights (batteries): {}", summary.num_segments),
        format!("Storage required: ~{:.1} GB", summary.storage_required_gb),
    ]);
    lines
}

pub fn flight_lines(segments: &[FlightSegment]) -> Vec<String> {
    if segments.len() < 2 {
        return Vec::new();
    }
    let mut lines = vec!["Flight breakdown:".to_string()];
    for segment in segments {
        lines.push(format!(
            "  Flight {}: {} waypoints, {} photos, {:.0} m, ~{:.1} min",
            segment.segment_index + 1,
            segment.waypoint_count(),
            segment.photo_count,
            segment.distance_m(),
            segment.estimated_duration_s / 60.0
        ));
    }
    lines
}

pub fn profile_lines(profile: &DroneProfile, is_default: bool) -> Vec<String> {
    let marker = if is_default { " (default)" } else { "" };
    vec![
        format!("{}{}", profile.id, marker),
        format!("  Name: {}", profile.name),
        format!(
            "  Resolution: {}x{} ({:.0}MP)",
            profile.image_width_px,
            profile.image_height_px,
            profile.megapixels()
        ),
        format!(
            "  Sensor: {:.2} x {:.2} mm, focal length {:.2} mm",
            profile.sensor_width_mm, profile.sensor_height_mm, profile.focal_length_mm
        ),
        format!("  Flight time: {} min", profile.max_flight_time_min),
        format!(
            "  Cruise speed: {} m/s (max {} m/s)",
            profile.cruise_speed_mps, profile.max_speed_mps
        ),
        format!("  Max altitude: {} m", profile.max_altitude_m),
    ]
}
