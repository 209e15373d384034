//! End-to-end mission planning: profile lookup through export.

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::export::{self, kml, litchi, waypoints::WaypointDocument, ExportFormat};
use crate::grid::{build_waypoints, plan_grid_geometry, GridGeometry};
use crate::models::{
    AreaOfInterest, DroneProfile, FlightSegment, MappingParameters, MissionSummary, Waypoint,
};
use crate::partition::partition;
use crate::profiles::ProfileRegistry;
use std::path::{Path, PathBuf};

/// A fully planned mission.
#[derive(Debug, Clone)]
pub struct MissionPlan {
    pub drone: DroneProfile,
    pub params: MappingParameters,
    pub area: AreaOfInterest,
    pub geometry: GridGeometry,
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<FlightSegment>,
    pub summary: MissionSummary,
}

/// Plan a survey of `area` with the profile `profile_id` from `registry`.
pub fn plan_mission(
    registry: &ProfileRegistry,
    profile_id: &str,
    area: &AreaOfInterest,
    params: &MappingParameters,
    config: &PlannerConfig,
) -> Result<MissionPlan> {
    config.validate()?;
    let drone = registry.get(profile_id)?;

    let geometry = plan_grid_geometry(area, drone, params)?;
    let waypoints = build_waypoints(area, &geometry);
    let segments = partition(&waypoints, drone, params, &config.partition)?;
    let summary = summarize(drone, area, &geometry, &waypoints, &segments, config);

    tracing::info!(
        profile = %drone.id,
        waypoints = summary.total_waypoints,
        photos = summary.photo_count,
        flights = summary.num_segments,
        flight_time_min = summary.total_flight_time_min(),
        "Planned survey mission"
    );

    Ok(MissionPlan {
        drone: drone.clone(),
        params: params.clone(),
        area: *area,
        geometry,
        waypoints,
        segments,
        summary,
    })
}

/// Summary only; same validation and numbers as [`plan_mission`].
pub fn estimate_mission(
    registry: &ProfileRegistry,
    profile_id: &str,
    area: &AreaOfInterest,
    params: &MappingParameters,
    config: &PlannerConfig,
) -> Result<MissionSummary> {
    plan_mission(registry, profile_id, area, params, config).map(|plan| plan.summary)
}

fn summarize(
    drone: &DroneProfile,
    area: &AreaOfInterest,
    geometry: &GridGeometry,
    waypoints: &[Waypoint],
    segments: &[FlightSegment],
    config: &PlannerConfig,
) -> MissionSummary {
    let photo_count = geometry.photo_count();
    MissionSummary {
        profile_id: drone.id.clone(),
        drone_name: drone.name.clone(),
        altitude_m: geometry.resolution.altitude_m,
        gsd_cm: geometry.resolution.gsd_cm,
        altitude_clamped: geometry.resolution.clamped,
        footprint: geometry.footprint,
        line_spacing_m: geometry.line_spacing_m,
        photo_spacing_m: geometry.photo_spacing_m,
        num_lines: geometry.num_lines,
        total_waypoints: waypoints.len(),
        photo_count,
        total_distance_m: waypoints
            .last()
            .map(|wp| wp.distance_from_start_m)
            .unwrap_or(0.0),
        total_flight_time_s: segments.iter().map(|s| s.estimated_duration_s).sum(),
        num_segments: segments.len(),
        area_m2: area.area_m2(),
        area_acres: area.area_acres(),
        storage_required_gb: photo_count as f64 * config.photo_size_mb / 1024.0,
    }
}

impl MissionPlan {
    /// Write the plan in `format` under `dir`; returns every file written.
    pub fn export(
        &self,
        format: ExportFormat,
        dir: &Path,
        stem: &str,
        mission_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let path = dir.join(format!("{}.{}", stem, format.extension()));
        match format {
            ExportFormat::Json => {
                let doc = WaypointDocument::new(
                    mission_name,
                    self.drone.id.clone(),
                    Some(self.summary.clone()),
                    self.segments.clone(),
                );
                export::waypoints::write(&path, &doc)?;
                Ok(vec![path])
            }
            ExportFormat::Kml => {
                kml::write(&path, mission_name, &self.segments)?;
                Ok(vec![path])
            }
            ExportFormat::Litchi => {
                let options = litchi::LitchiOptions {
                    speed_mps: self.params.effective_speed(&self.drone),
                    gimbal_pitch_deg: self.params.gimbal_pitch_deg,
                };
                litchi::write_all(dir, stem, &self.segments, &options)
            }
        }
    }
}
