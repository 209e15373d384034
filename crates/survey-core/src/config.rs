//! Planner configuration.
//!
//! Every tunable the pipeline reads is listed here with its default; values are
//! validated once before planning starts.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Battery and timing model used when splitting a path into flights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Fraction of rated flight time usable per battery (0.8 lands at ~20-30% remaining)
    pub reserve_fraction: f64,
    /// Deceleration/acceleration time charged at each line transition
    pub turn_penalty_s: f64,
    /// Hover time charged per photo
    pub photo_dwell_s: f64,
    /// Charge climb to and descent from survey altitude to every flight
    pub include_takeoff_landing: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            reserve_fraction: 0.8,
            turn_penalty_s: 5.0,
            photo_dwell_s: 2.0,
            include_takeoff_landing: true,
        }
    }
}

impl PartitionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.reserve_fraction.is_finite()
            || self.reserve_fraction <= 0.0
            || self.reserve_fraction > 1.0
        {
            return Err(Error::invalid(
                "reserve_fraction",
                self.reserve_fraction,
                "must be in (0, 1]",
            ));
        }
        if !self.turn_penalty_s.is_finite() || self.turn_penalty_s < 0.0 {
            return Err(Error::invalid(
                "turn_penalty_s",
                self.turn_penalty_s,
                "must be zero or positive",
            ));
        }
        if !self.photo_dwell_s.is_finite() || self.photo_dwell_s < 0.0 {
            return Err(Error::invalid(
                "photo_dwell_s",
                self.photo_dwell_s,
                "must be zero or positive",
            ));
        }
        Ok(())
    }
}

/// Top-level planner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub partition: PartitionConfig,
    /// Average photo size used for the storage estimate
    pub photo_size_mb: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            partition: PartitionConfig::default(),
            photo_size_mb: 5.0,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        self.partition.validate()?;
        if !self.photo_size_mb.is_finite() || self.photo_size_mb < 0.0 {
            return Err(Error::invalid(
                "photo_size_mb",
                self.photo_size_mb,
                "must be zero or positive",
            ));
        }
        Ok(())
    }

    pub fn with_reserve_fraction(mut self, reserve_fraction: f64) -> Self {
        self.partition.reserve_fraction = reserve_fraction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.partition.reserve_fraction, 0.8);
    }

    #[test]
    fn test_reserve_fraction_bounds() {
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            let config = PlannerConfig::default().with_reserve_fraction(bad);
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
        PlannerConfig::default().with_reserve_fraction(1.0).validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"partition": {"turn_penalty_s": 8.0}}"#).unwrap();
        assert_eq!(config.partition.turn_penalty_s, 8.0);
        assert_eq!(config.partition.reserve_fraction, 0.8);
        assert_eq!(config.photo_size_mb, 5.0);
    }
}
