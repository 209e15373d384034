//! Lossless JSON waypoint list.
//!
//! Every waypoint field is written verbatim; floats use shortest round-trip
//! formatting so re-importing yields a bit-identical sequence.

use super::write_atomic;
use crate::error::{Error, Result};
use crate::models::{FlightSegment, MissionSummary, Waypoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;

/// On-disk waypoint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDocument {
    pub format_version: u32,
    pub mission_name: String,
    pub created_at: DateTime<Utc>,
    pub profile_id: String,
    #[serde(default)]
    pub summary: Option<MissionSummary>,
    pub segments: Vec<FlightSegment>,
}

impl WaypointDocument {
    pub fn new(
        mission_name: impl Into<String>,
        profile_id: impl Into<String>,
        summary: Option<MissionSummary>,
        segments: Vec<FlightSegment>,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            mission_name: mission_name.into(),
            created_at: Utc::now(),
            profile_id: profile_id.into(),
            summary,
            segments,
        }
    }

    /// All waypoints in flight order.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.segments
            .iter()
            .flat_map(|segment| segment.waypoints.iter().cloned())
            .collect()
    }
}

pub fn render(doc: &WaypointDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn write(path: &Path, doc: &WaypointDocument) -> Result<()> {
    let json = render(doc)?;
    write_atomic(path, json.as_bytes())
}

/// Parse a waypoint list and check the sequence is contiguous.
pub fn parse(json: &str) -> Result<WaypointDocument> {
    let doc: WaypointDocument =
        serde_json::from_str(json).map_err(|e| Error::ImportFormat(e.to_string()))?;
    if doc.format_version != FORMAT_VERSION {
        return Err(Error::ImportFormat(format!(
            "unsupported format version {} (expected {})",
            doc.format_version, FORMAT_VERSION
        )));
    }

    let mut expected = 0usize;
    for (i, segment) in doc.segments.iter().enumerate() {
        if segment.segment_index != i {
            return Err(Error::ImportFormat(format!(
                "segment {} has index {}",
                i, segment.segment_index
            )));
        }
        for wp in &segment.waypoints {
            if wp.index != expected {
                return Err(Error::ImportFormat(format!(
                    "waypoint sequence broken: expected index {}, found {}",
                    expected, wp.index
                )));
            }
            expected += 1;
        }
    }
    Ok(doc)
}

/// Read a waypoint list back into the ordered waypoint sequence.
pub fn import_waypoint_list(path: &Path) -> Result<Vec<Waypoint>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::ImportFormat(format!("{}: {}", path.display(), e)))?;
    Ok(parse(&json)?.waypoints())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WaypointAction;

    fn segment(index: usize, start: usize) -> FlightSegment {
        let waypoints = (start..start + 3)
            .map(|i| Waypoint {
                index: i,
                line_index: index,
                lat: 40.712_8 + i as f64 * 1.0e-5 / 3.0,
                lon: -74.006 - i as f64 * 0.1 / 7.0,
                altitude_m: 70.000_000_000_1,
                heading_deg: if index % 2 == 0 { 0.0 } else { 180.0 },
                action: if i % 3 == 2 {
                    WaypointAction::None
                } else {
                    WaypointAction::CapturePhoto
                },
                distance_from_start_m: i as f64 * 7.7,
            })
            .collect::<Vec<_>>();
        FlightSegment {
            segment_index: index,
            photo_count: 2,
            estimated_duration_s: 123.456,
            waypoints,
        }
    }

    #[test]
    fn test_file_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mission.json");
        let segments = vec![segment(0, 0), segment(1, 3)];
        let doc = WaypointDocument::new("Farm", "generic", None, segments);
        write(&path, &doc).unwrap();

        let imported = import_waypoint_list(&path).unwrap();
        let expected = doc.waypoints();
        assert_eq!(imported, expected);
        for (a, b) in imported.iter().zip(&expected) {
            assert_eq!(a.lat.to_bits(), b.lat.to_bits());
            assert_eq!(a.lon.to_bits(), b.lon.to_bits());
        }
    }

    #[test]
    fn test_action_serialized_as_snake_case() {
        let doc = WaypointDocument::new("Farm", "generic", None, vec![segment(0, 0)]);
        let json = render(&doc).unwrap();
        assert!(json.contains("\"capture_photo\""));
        assert!(json.contains("\"none\""));
    }

    #[test]
    fn test_broken_sequence_rejected() {
        let segments = vec![segment(0, 0), segment(1, 5)];
        let doc = WaypointDocument::new("Farm", "generic", None, segments);
        let json = render(&doc).unwrap();
        assert!(matches!(parse(&json), Err(Error::ImportFormat(_))));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut doc = WaypointDocument::new("Farm", "generic", None, vec![segment(0, 0)]);
        doc.format_version = 99;
        let json = render(&doc).unwrap();
        assert!(matches!(parse(&json), Err(Error::ImportFormat(_))));
    }
}
