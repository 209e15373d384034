//! Error types for survey planning.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for survey-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while planning or exporting a survey mission.
///
/// All of these are deterministic functions of the input; none are retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter is out of its valid range
    #[error("invalid parameter `{parameter}` = {value}: {reason}")]
    InvalidParameters {
        parameter: &'static str,
        value: f64,
        reason: String,
    },

    /// Overlap of 100% or more leaves no spacing between photos or lines
    #[error("degenerate overlap: `{parameter}` = {overlap_pct}% leaves no spacing (must be < 100)")]
    DegenerateOverlap {
        parameter: &'static str,
        overlap_pct: f64,
    },

    /// One coverage line cannot be flown on a single battery
    #[error(
        "line {line_index} needs {line_time_s:.1}s but a single battery allows {budget_s:.1}s"
    )]
    InfeasibleLineLength {
        line_index: usize,
        line_time_s: f64,
        budget_s: f64,
    },

    /// Unknown drone profile id
    #[error("drone profile `{id}` not found (available: {})", .available.join(", "))]
    ProfileNotFound { id: String, available: Vec<String> },

    /// Malformed profile registry document
    #[error("invalid profile registry: {0}")]
    ProfileFormat(String),

    /// Export destination could not be written
    #[error("failed to write {}: {reason}", .path.display())]
    ExportIOFailure { path: PathBuf, reason: String },

    /// Malformed waypoint-list document
    #[error("invalid waypoint list: {0}")]
    ImportFormat(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Error::InvalidParameters {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn export(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::ExportIOFailure {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
