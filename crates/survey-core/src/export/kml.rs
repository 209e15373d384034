//! KML 2.2 export for mapping viewers.
//!
//! One folder per flight holding the flight's path as a `LineString` and a
//! `Point` placemark per photo. KML coordinates are `lon,lat,alt`.

use super::{write_atomic, xml_escape};
use crate::error::Result;
use crate::models::FlightSegment;
use std::path::Path;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Path line colors (aabbggrr), cycled per flight.
const FLIGHT_COLORS: [&str; 6] = [
    "ff0000ff", "ff00a5ff", "ff00ffff", "ff00ff00", "ffff0000", "ffff00ff",
];

fn coordinate(lon: f64, lat: f64, alt: f64) -> String {
    format!("{:.8},{:.8},{:.2}", lon, lat, alt)
}

pub fn render(mission_name: &str, segments: &[FlightSegment]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<kml xmlns=\"{}\">\n", KML_NAMESPACE));
    out.push_str("<Document>\n");
    out.push_str(&format!("  <name>{}</name>\n", xml_escape(mission_name)));

    for (i, color) in FLIGHT_COLORS.iter().enumerate() {
        out.push_str(&format!(
            "  <Style id=\"flight{i}\"><LineStyle><color>{color}</color>\
             <width>3</width></LineStyle></Style>\n"
        ));
    }
    out.push_str(
        "  <Style id=\"photo\"><IconStyle><scale>0.4</scale><Icon>\
         <href>http://maps.google.com/mapfiles/kml/shapes/camera.png</href>\
         </Icon></IconStyle></Style>\n",
    );

    for segment in segments {
        render_segment(&mut out, segment);
    }

    out.push_str("</Document>\n</kml>\n");
    out
}

fn render_segment(out: &mut String, segment: &FlightSegment) {
    let number = segment.segment_index + 1;
    out.push_str("  <Folder>\n");
    out.push_str(&format!("    <name>Flight {}</name>\n", number));
    out.push_str(&format!(
        "    <description>{} waypoints, {} photos, {:.0} m, ~{:.1} min</description>\n",
        segment.waypoint_count(),
        segment.photo_count,
        segment.distance_m(),
        segment.estimated_duration_s / 60.0
    ));

    let coords: Vec<String> = segment
        .waypoints
        .iter()
        .map(|wp| coordinate(wp.lon, wp.lat, wp.altitude_m))
        .collect();
    out.push_str("    <Placemark>\n");
    out.push_str(&format!("      <name>Flight {} path</name>\n", number));
    out.push_str(&format!(
        "      <styleUrl>#flight{}</styleUrl>\n",
        segment.segment_index % FLIGHT_COLORS.len()
    ));
    out.push_str("      <LineString>\n");
    out.push_str("        <tessellate>1</tessellate>\n");
    out.push_str("        <altitudeMode>relativeToGround</altitudeMode>\n");
    out.push_str(&format!("        <coordinates>{}</coordinates>\n", coords.join(" ")));
    out.push_str("      </LineString>\n");
    out.push_str("    </Placemark>\n");

    for wp in segment.waypoints.iter().filter(|wp| wp.is_capture()) {
        out.push_str("    <Placemark>\n");
        out.push_str(&format!("      <name>Photo {}</name>\n", wp.index + 1));
        out.push_str("      <styleUrl>#photo</styleUrl>\n");
        out.push_str("      <Point>\n");
        out.push_str("        <altitudeMode>relativeToGround</altitudeMode>\n");
        out.push_str(&format!(
            "        <coordinates>{}</coordinates>\n",
            coordinate(wp.lon, wp.lat, wp.altitude_m)
        ));
        out.push_str("      </Point>\n");
        out.push_str("    </Placemark>\n");
    }

    out.push_str("  </Folder>\n");
}

pub fn write(path: &Path, mission_name: &str, segments: &[FlightSegment]) -> Result<()> {
    let kml = render(mission_name, segments);
    write_atomic(path, kml.as_bytes())
}
