pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod mission;
pub mod models;
pub mod optics;
pub mod partition;
pub mod profiles;
pub mod spatial;

pub use config::{PartitionConfig, PlannerConfig};
pub use error::{Error, Result};
pub use export::{waypoints::import_waypoint_list, ExportFormat};
pub use grid::{generate_grid_pattern, line_count, plan_grid_geometry, GridGeometry, LineDirection};
pub use mission::{estimate_mission, plan_mission, MissionPlan};
pub use models::{
    AltitudeResolution, AreaOfInterest, DroneProfile, FlightSegment, Footprint, MappingParameters,
    MissionSummary, Waypoint, WaypointAction,
};
pub use optics::{compute_footprint, compute_gsd, resolve_altitude, resolve_mapping_altitude};
pub use partition::{partition, usable_time_budget};
pub use profiles::ProfileRegistry;
pub use spatial::haversine_distance;
