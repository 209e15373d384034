//! Battery-bounded mission partitioning.
//!
//! Waypoints are packed greedily, in order, into flights. A flight may only
//! begin at the first waypoint of a coverage line so overlap within a pass is
//! never broken.

use crate::config::PartitionConfig;
use crate::error::{Error, Result};
use crate::models::{DroneProfile, FlightSegment, MappingParameters, Waypoint, WaypointAction};

/// Usable seconds of flight per battery.
pub fn usable_time_budget(drone: &DroneProfile, config: &PartitionConfig) -> f64 {
    drone.max_flight_time_min * 60.0 * config.reserve_fraction
}

/// Split `waypoints` into flights that each fit on one battery.
///
/// Concatenating the returned segments reproduces `waypoints` exactly.
pub fn partition(
    waypoints: &[Waypoint],
    drone: &DroneProfile,
    params: &MappingParameters,
    config: &PartitionConfig,
) -> Result<Vec<FlightSegment>> {
    config.validate()?;
    let speed = params.effective_speed(drone);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(Error::invalid("speed_mps", speed, "speed must be positive"));
    }
    if waypoints.is_empty() {
        return Ok(Vec::new());
    }
    check_ordering(waypoints)?;

    let model = TimeModel::new(waypoints, drone, speed, config);
    let lines = split_lines(waypoints);

    let mut segments: Vec<FlightSegment> = Vec::new();
    let mut open: Option<OpenSegment> = None;

    for line in lines {
        let line_time = model.line_time(line);
        if model.overhead_s + line_time > model.budget_s {
            return Err(Error::InfeasibleLineLength {
                line_index: line[0].line_index,
                line_time_s: model.overhead_s + line_time,
                budget_s: model.budget_s,
            });
        }

        open = Some(match open.take() {
            None => OpenSegment::start(line, model.overhead_s + line_time),
            Some(mut current) => {
                let added = model.leg_time(current.last(), &line[0]) + line_time;
                if current.duration_s + added > model.budget_s {
                    segments.push(current.close(segments.len()));
                    OpenSegment::start(line, model.overhead_s + line_time)
                } else {
                    current.extend(line, added);
                    current
                }
            }
        });
    }

    if let Some(current) = open {
        segments.push(current.close(segments.len()));
    }

    tracing::info!(
        segments = segments.len(),
        waypoints = waypoints.len(),
        budget_s = model.budget_s,
        "Partitioned mission into flights"
    );

    Ok(segments)
}

fn check_ordering(waypoints: &[Waypoint]) -> Result<()> {
    for pair in waypoints.windows(2) {
        if pair[1].index <= pair[0].index || pair[1].line_index < pair[0].line_index {
            return Err(Error::invalid(
                "waypoint_index",
                pair[1].index as f64,
                format!("waypoints out of order after index {}", pair[0].index),
            ));
        }
        if pair[1].distance_from_start_m < pair[0].distance_from_start_m {
            return Err(Error::invalid(
                "distance_from_start_m",
                pair[1].distance_from_start_m,
                format!("cumulative distance decreases at index {}", pair[1].index),
            ));
        }
    }
    Ok(())
}

/// Contiguous runs of waypoints sharing a line index.
fn split_lines(waypoints: &[Waypoint]) -> Vec<&[Waypoint]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for i in 1..waypoints.len() {
        if waypoints[i].line_index != waypoints[start].line_index {
            lines.push(&waypoints[start..i]);
            start = i;
        }
    }
    lines.push(&waypoints[start..]);
    lines
}

struct TimeModel {
    speed_mps: f64,
    budget_s: f64,
    overhead_s: f64,
    turn_penalty_s: f64,
    photo_dwell_s: f64,
}

impl TimeModel {
    fn new(
        waypoints: &[Waypoint],
        drone: &DroneProfile,
        speed_mps: f64,
        config: &PartitionConfig,
    ) -> Self {
        let overhead_s = if config.include_takeoff_landing {
            let altitude = waypoints
                .iter()
                .map(|wp| wp.altitude_m)
                .fold(0.0_f64, f64::max);
            2.0 * altitude / speed_mps
        } else {
            0.0
        };
        Self {
            speed_mps,
            budget_s: usable_time_budget(drone, config),
            overhead_s,
            turn_penalty_s: config.turn_penalty_s,
            photo_dwell_s: config.photo_dwell_s,
        }
    }

    fn leg_time(&self, from: &Waypoint, to: &Waypoint) -> f64 {
        (to.distance_from_start_m - from.distance_from_start_m) / self.speed_mps
    }

    fn dwell_time(&self, wp: &Waypoint) -> f64 {
        match wp.action {
            WaypointAction::CapturePhoto => self.photo_dwell_s,
            WaypointAction::None => self.turn_penalty_s,
        }
    }

    /// Time to fly one line from its first waypoint, including dwell and turns.
    fn line_time(&self, line: &[Waypoint]) -> f64 {
        let dwell: f64 = line.iter().map(|wp| self.dwell_time(wp)).sum();
        let travel = match (line.first(), line.last()) {
            (Some(first), Some(last)) => self.leg_time(first, last),
            _ => 0.0,
        };
        dwell + travel
    }
}

struct OpenSegment<'a> {
    waypoints: Vec<&'a [Waypoint]>,
    duration_s: f64,
}

impl<'a> OpenSegment<'a> {
    fn start(line: &'a [Waypoint], duration_s: f64) -> Self {
        Self {
            waypoints: vec![line],
            duration_s,
        }
    }

    fn extend(&mut self, line: &'a [Waypoint], added_s: f64) {
        self.waypoints.push(line);
        self.duration_s += added_s;
    }

    fn last(&self) -> &'a Waypoint {
        // Lines produced by split_lines are never empty.
        let line = self.waypoints[self.waypoints.len() - 1];
        &line[line.len() - 1]
    }

    fn close(self, segment_index: usize) -> FlightSegment {
        let waypoints: Vec<Waypoint> = self.waypoints.concat();
        let photo_count = waypoints.iter().filter(|wp| wp.is_capture()).count();
        FlightSegment {
            segment_index,
            waypoints,
            estimated_duration_s: self.duration_s,
            photo_count,
        }
    }
}
