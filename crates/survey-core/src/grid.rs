//! Lawn-mower coverage path generation.
//!
//! Lines run north/south and are stepped west to east. The nominal area is
//! grown by half a footprint on every edge so photos centred on the outer
//! lines and line ends still cover the boundary with full overlap.

use crate::error::{Error, Result};
use crate::models::{
    AltitudeResolution, AreaOfInterest, DroneProfile, Footprint, MappingParameters, Waypoint,
    WaypointAction,
};
use crate::optics::{compute_footprint, resolve_mapping_altitude};
use crate::spatial::{local_to_geodetic, LocalPoint};
use serde::{Deserialize, Serialize};

/// Upper bound on generated waypoints; beyond this the inputs are nonsensical.
pub const MAX_WAYPOINTS: usize = 250_000;

/// Direction of travel along a coverage line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDirection {
    North,
    South,
}

impl LineDirection {
    pub fn heading_deg(self) -> f64 {
        match self {
            LineDirection::North => 0.0,
            LineDirection::South => 180.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            LineDirection::North => LineDirection::South,
            LineDirection::South => LineDirection::North,
        }
    }
}

/// Everything about the grid that can be known without placing waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub resolution: AltitudeResolution,
    pub footprint: Footprint,
    pub line_spacing_m: f64,
    pub photo_spacing_m: f64,
    pub expanded_width_m: f64,
    pub expanded_height_m: f64,
    pub num_lines: usize,
    pub points_per_line: usize,
}

impl GridGeometry {
    /// Captures plus one transition between each pair of lines.
    pub fn waypoint_count(&self) -> usize {
        self.photo_count().saturating_add(self.num_lines.saturating_sub(1))
    }

    pub fn photo_count(&self) -> usize {
        self.num_lines.saturating_mul(self.points_per_line)
    }
}

/// Number of parallel lines needed to span `extent_m`: `ceil(extent / spacing) + 1`.
pub fn line_count(extent_m: f64, spacing_m: f64) -> usize {
    ((extent_m / spacing_m).ceil() as usize).saturating_add(1)
}

/// Resolve altitude, footprint, spacings and counts for an area.
pub fn plan_grid_geometry(
    area: &AreaOfInterest,
    drone: &DroneProfile,
    params: &MappingParameters,
) -> Result<GridGeometry> {
    area.validate()?;
    drone.validate()?;
    let resolution = resolve_mapping_altitude(params, drone)?;
    let footprint = compute_footprint(resolution.altitude_m, drone);

    let line_spacing_m = footprint.width_m * (1.0 - params.side_overlap_pct / 100.0);
    let photo_spacing_m = footprint.height_m * (1.0 - params.forward_overlap_pct / 100.0);

    let expanded_width_m = area.width_m + footprint.width_m;
    let expanded_height_m = area.height_m + footprint.height_m;

    // Bound the counts in floating point; the integer casts below saturate.
    let lines_f = (expanded_width_m / line_spacing_m).ceil() + 1.0;
    let points_f = (expanded_height_m / photo_spacing_m).ceil() + 1.0;
    let waypoints_f = lines_f * points_f + (lines_f - 1.0);
    if !waypoints_f.is_finite() || waypoints_f > MAX_WAYPOINTS as f64 {
        return Err(Error::invalid(
            "waypoint_count",
            waypoints_f,
            format!(
                "grid would need more than {} waypoints; raise altitude/GSD or shrink the area",
                MAX_WAYPOINTS
            ),
        ));
    }

    let num_lines = line_count(expanded_width_m, line_spacing_m);
    let points_per_line = line_count(expanded_height_m, photo_spacing_m);

    let geometry = GridGeometry {
        resolution,
        footprint,
        line_spacing_m,
        photo_spacing_m,
        expanded_width_m,
        expanded_height_m,
        num_lines,
        points_per_line,
    };

    tracing::debug!(
        footprint_w = footprint.width_m,
        footprint_h = footprint.height_m,
        line_spacing_m,
        photo_spacing_m,
        num_lines,
        points_per_line,
        "Planned grid geometry"
    );

    Ok(geometry)
}

/// Generate the full ordered waypoint sequence for a rectangular area.
///
/// Identical inputs always produce a bit-identical sequence.
pub fn generate_grid_pattern(
    area: &AreaOfInterest,
    drone: &DroneProfile,
    params: &MappingParameters,
) -> Result<Vec<Waypoint>> {
    let geometry = plan_grid_geometry(area, drone, params)?;
    Ok(build_waypoints(area, &geometry))
}

pub(crate) fn build_waypoints(area: &AreaOfInterest, geometry: &GridGeometry) -> Vec<Waypoint> {
    let half_w = geometry.expanded_width_m / 2.0;
    let half_h = geometry.expanded_height_m / 2.0;

    // Along-track stations shared by every line, south to north.
    let stations: Vec<f64> = (0..geometry.points_per_line)
        .map(|j| j as f64 * geometry.photo_spacing_m - half_h)
        .collect();

    let mut path = PathBuilder::new(
        area,
        geometry.resolution.altitude_m,
        geometry.waypoint_count(),
    );
    let mut direction = LineDirection::North;

    for line in 0..geometry.num_lines {
        let x = line as f64 * geometry.line_spacing_m - half_w;
        let heading = direction.heading_deg();

        let mut end_y = 0.0;
        let ordered: Box<dyn Iterator<Item = &f64>> = match direction {
            LineDirection::North => Box::new(stations.iter()),
            LineDirection::South => Box::new(stations.iter().rev()),
        };
        for &y in ordered {
            path.push(LocalPoint::new(x, y), line, heading, WaypointAction::CapturePhoto);
            end_y = y;
        }

        let next = direction.reversed();
        if line + 1 < geometry.num_lines {
            let turn = LocalPoint::new(x + geometry.line_spacing_m / 2.0, end_y);
            path.push(turn, line, next.heading_deg(), WaypointAction::None);
        }
        direction = next;
    }

    path.finish()
}

struct PathBuilder<'a> {
    area: &'a AreaOfInterest,
    altitude_m: f64,
    waypoints: Vec<Waypoint>,
    distance_m: f64,
    last: Option<LocalPoint>,
}

impl<'a> PathBuilder<'a> {
    fn new(area: &'a AreaOfInterest, altitude_m: f64, capacity: usize) -> Self {
        Self {
            area,
            altitude_m,
            waypoints: Vec::with_capacity(capacity),
            distance_m: 0.0,
            last: None,
        }
    }

    fn push(
        &mut self,
        point: LocalPoint,
        line_index: usize,
        heading_deg: f64,
        action: WaypointAction,
    ) {
        if let Some(last) = self.last {
            self.distance_m += last.distance_to(&point);
        }
        self.last = Some(point);

        let (lat, lon) = local_to_geodetic(self.area.center_lat, self.area.center_lon, point);
        self.waypoints.push(Waypoint {
            index: self.waypoints.len(),
            line_index,
            lat,
            lon,
            altitude_m: self.altitude_m,
            heading_deg,
            action,
            distance_from_start_m: self.distance_m,
        });
    }

    fn finish(self) -> Vec<Waypoint> {
        self.waypoints
    }
}
