//! Survey area arguments.

use anyhow::{bail, Result};
use clap::Args;
use survey_core::AreaOfInterest;

/// Where and how large the survey area is.
#[derive(Args, Debug, Clone)]
pub struct AreaArgs {
    /// Center latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Center longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Square area in acres
    #[arg(long, conflicts_with_all = ["area_m2", "width", "height"])]
    pub area_acres: Option<f64>,

    /// Square area in square meters
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub area_m2: Option<f64>,

    /// East-west extent in meters
    #[arg(long, requires = "height")]
    pub width: Option<f64>,

    /// North-south extent in meters
    #[arg(long, requires = "width")]
    pub height: Option<f64>,
}

impl AreaArgs {
    pub fn to_area(&self) -> Result<AreaOfInterest> {
        let (lat, lon) = (self.lat, self.lon);
        let area = match (self.area_acres, self.area_m2, self.width, self.height) {
            (Some(acres), None, None, None) => AreaOfInterest::from_acres(lat, lon, acres)?,
            (None, Some(m2), None, None) => AreaOfInterest::from_square_meters(lat, lon, m2)?,
            (None, None, Some(w), Some(h)) => AreaOfInterest::new(lat, lon, w, h)?,
            _ => bail!("give exactly one of --area-acres, --area-m2, or --width with --height"),
        };
        Ok(area)
    }
}
