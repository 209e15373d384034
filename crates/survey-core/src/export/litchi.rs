//! Litchi mission CSV export.
//!
//! The column set and order below are what the Litchi mission hub imports;
//! do not reorder or drop columns.

use super::write_atomic_all;
use crate::error::Result;
use crate::models::{FlightSegment, Waypoint};
use std::path::{Path, PathBuf};

/// Litchi refuses missions longer than this.
pub const MAX_WAYPOINTS_PER_MISSION: usize = 99;

const ACTION_SLOTS: usize = 15;
const ACTION_TAKE_PHOTO: i32 = 1;
const ACTION_NONE: i32 = -1;
/// Gimbal pitch interpolated between waypoints
const GIMBAL_MODE_INTERPOLATE: i32 = 2;
/// Altitude relative to takeoff point
const ALTITUDE_MODE_RELATIVE: i32 = 0;

/// Mission-wide values repeated on every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitchiOptions {
    pub speed_mps: f64,
    pub gimbal_pitch_deg: f64,
}

pub fn header() -> String {
    let mut columns: Vec<String> = [
        "latitude",
        "longitude",
        "altitude(m)",
        "heading(deg)",
        "curvesize(m)",
        "rotationdir",
        "gimbalmode",
        "gimbalpitchangle",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    for slot in 1..=ACTION_SLOTS {
        columns.push(format!("actiontype{}", slot));
        columns.push(format!("actionparam{}", slot));
    }
    columns.extend(
        [
            "altitudemode",
            "speed(m/s)",
            "poi_latitude",
            "poi_longitude",
            "poi_altitude(m)",
            "poi_altitudemode",
            "photo_timeinterval",
            "photo_distinterval",
        ]
        .iter()
        .map(|c| c.to_string()),
    );
    columns.join(",")
}

fn row(wp: &Waypoint, options: &LitchiOptions) -> String {
    let mut fields = vec![
        format!("{:.8}", wp.lat),
        format!("{:.8}", wp.lon),
        format!("{:.2}", wp.altitude_m),
        format!("{:.1}", wp.heading_deg),
        "0".to_string(),
        "0".to_string(),
        GIMBAL_MODE_INTERPOLATE.to_string(),
        format!("{:.0}", options.gimbal_pitch_deg),
    ];

    let first_action = if wp.is_capture() {
        ACTION_TAKE_PHOTO
    } else {
        ACTION_NONE
    };
    fields.push(first_action.to_string());
    fields.push("0".to_string());
    for _ in 1..ACTION_SLOTS {
        fields.push(ACTION_NONE.to_string());
        fields.push("0".to_string());
    }

    fields.extend([
        ALTITUDE_MODE_RELATIVE.to_string(),
        format!("{:.1}", options.speed_mps),
        "0".to_string(),
        "0".to_string(),
        "0".to_string(),
        "0".to_string(),
        "-1".to_string(),
        "-1".to_string(),
    ]);
    fields.join(",")
}

/// Render one flight as a Litchi CSV document.
pub fn render(segment: &FlightSegment, options: &LitchiOptions) -> String {
    if segment.waypoint_count() > MAX_WAYPOINTS_PER_MISSION {
        tracing::warn!(
            flight = segment.segment_index + 1,
            waypoints = segment.waypoint_count(),
            limit = MAX_WAYPOINTS_PER_MISSION,
            "Flight exceeds Litchi waypoint limit; split it in the mission hub before flying"
        );
    }

    let mut out = header();
    out.push('\n');
    for wp in &segment.waypoints {
        out.push_str(&row(wp, options));
        out.push('\n');
    }
    out
}

pub fn file_name(stem: &str, segment: &FlightSegment) -> String {
    format!("{}_flight_{}.csv", stem, segment.segment_index + 1)
}

/// Write one CSV per flight into `dir`; returns the written paths in flight order.
///
/// Either every flight file is written or none is.
pub fn write_all(
    dir: &Path,
    stem: &str,
    segments: &[FlightSegment],
    options: &LitchiOptions,
) -> Result<Vec<PathBuf>> {
    let rendered: Vec<(PathBuf, Vec<u8>)> = segments
        .iter()
        .map(|segment| {
            let path = dir.join(file_name(stem, segment));
            (path, render(segment, options).into_bytes())
        })
        .collect();

    write_atomic_all(&rendered)?;
    Ok(rendered.into_iter().map(|(path, _)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::WaypointAction;

    fn options() -> LitchiOptions {
        LitchiOptions {
            speed_mps: 8.0,
            gimbal_pitch_deg: -90.0,
        }
    }

    fn segment() -> FlightSegment {
        let wp = |index: usize, action| Waypoint {
            index,
            line_index: 0,
            lat: 33.6846,
            lon: -117.8265,
            altitude_m: 70.0,
            heading_deg: 180.0,
            action,
            distance_from_start_m: 0.0,
        };
        FlightSegment {
            segment_index: 2,
            waypoints: vec![wp(0, WaypointAction::CapturePhoto), wp(1, WaypointAction::None)],
            estimated_duration_s: 10.0,
            photo_count: 1,
        }
    }

    #[test]
    fn test_header_column_contract() {
        let header = header();
        let columns: Vec<&str> = header.split(',').collect();
        assert_eq!(columns.len(), 8 + 2 * ACTION_SLOTS + 8);
        assert_eq!(&columns[..4], &["latitude", "longitude", "altitude(m)", "heading(deg)"]);
        assert_eq!(columns[8], "actiontype1");
        assert_eq!(columns[37], "actionparam15");
        assert_eq!(columns[38], "altitudemode");
        assert_eq!(columns[39], "speed(m/s)");
        assert_eq!(columns.last(), Some(&"photo_distinterval"));
    }

    #[test]
    fn test_rows_match_header_width() {
        let csv = render(&segment(), &options());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        let width = lines[0].split(',').count();
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), width);
        }
    }

    #[test]
    fn test_action_codes() {
        let csv = render(&segment(), &options());
        let rows: Vec<Vec<&str>> = csv.lines().skip(1).map(|l| l.split(',').collect()).collect();
        assert_eq!(rows[0][8], "1");
        assert_eq!(rows[1][8], "-1");
        assert_eq!(rows[0][7], "-90");
        assert_eq!(rows[0][39], "8.0");
        assert_eq!(rows[0][3], "180.0");
    }

    #[test]
    fn test_write_all_names_files_per_flight() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_all(dir.path(), "farm", &[segment()], &options()).unwrap();
        assert_eq!(paths, vec![dir.path().join("farm_flight_3.csv")]);
        let text = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(text.starts_with("latitude,longitude"));
    }

    #[test]
    fn test_write_all_leaves_nothing_when_a_flight_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("farm_flight_2.csv")).unwrap();
        let first = FlightSegment {
            segment_index: 0,
            ..segment()
        };
        let second = FlightSegment {
            segment_index: 1,
            ..segment()
        };

        let result = write_all(dir.path(), "farm", &[first, second], &options());
        assert!(matches!(result, Err(Error::ExportIOFailure { .. })));
        assert!(!dir.path().join("farm_flight_1.csv").exists());
    }
}
