//! Drone profile registry.
//!
//! The registry is an immutable map handed to the planner explicitly. It can be
//! built from the bundled profiles or from a `drone_profiles.json` document:
//!
//! ```json
//! {
//!   "default_profile": "dji_mini_3_pro",
//!   "profiles": {
//!     "dji_mini_3_pro": {
//!       "name": "DJI Mini 3 Pro",
//!       "camera": { "sensor_width_mm": 9.6, "sensor_height_mm": 7.2, "focal_length_mm": 6.72,
//!                   "image_width_px": 4032, "image_height_px": 3024 },
//!       "flight": { "max_flight_time_min": 34, "cruise_speed_ms": 10.0, "max_altitude_m": 120 }
//!     }
//!   }
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::DroneProfile;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_HOVER_ACCURACY_M: f64 = 0.5;

/// Immutable lookup of drone profiles by id.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, DroneProfile>,
    default_id: String,
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    default_profile: Option<String>,
    profiles: HashMap<String, ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    name: String,
    camera: CameraEntry,
    flight: FlightEntry,
}

#[derive(Debug, Deserialize)]
struct CameraEntry {
    sensor_width_mm: f64,
    sensor_height_mm: f64,
    focal_length_mm: f64,
    image_width_px: u32,
    image_height_px: u32,
}

#[derive(Debug, Deserialize)]
struct FlightEntry {
    max_flight_time_min: f64,
    cruise_speed_ms: f64,
    #[serde(default)]
    max_speed_ms: Option<f64>,
    max_altitude_m: f64,
    #[serde(default)]
    hover_accuracy_m: Option<f64>,
}

impl ProfileEntry {
    fn into_profile(self, id: String) -> DroneProfile {
        DroneProfile {
            id,
            name: self.name,
            sensor_width_mm: self.camera.sensor_width_mm,
            sensor_height_mm: self.camera.sensor_height_mm,
            focal_length_mm: self.camera.focal_length_mm,
            image_width_px: self.camera.image_width_px,
            image_height_px: self.camera.image_height_px,
            max_flight_time_min: self.flight.max_flight_time_min,
            cruise_speed_mps: self.flight.cruise_speed_ms,
            max_speed_mps: self.flight.max_speed_ms.unwrap_or(self.flight.cruise_speed_ms),
            max_altitude_m: self.flight.max_altitude_m,
            hover_accuracy_m: self
                .flight
                .hover_accuracy_m
                .unwrap_or(DEFAULT_HOVER_ACCURACY_M),
        }
    }
}

impl ProfileRegistry {
    /// Build a registry from profiles; every profile is validated.
    pub fn new(profiles: Vec<DroneProfile>, default_id: impl Into<String>) -> Result<Self> {
        let default_id = default_id.into();
        let mut map = HashMap::with_capacity(profiles.len());
        for profile in profiles {
            profile.validate().map_err(|e| {
                Error::ProfileFormat(format!("profile `{}` is invalid: {}", profile.id, e))
            })?;
            if map.insert(profile.id.clone(), profile).is_some() {
                return Err(Error::ProfileFormat("duplicate profile id".to_string()));
            }
        }
        if !map.contains_key(&default_id) {
            return Err(Error::ProfileFormat(format!(
                "default profile `{}` is not defined",
                default_id
            )));
        }
        Ok(Self {
            profiles: map,
            default_id,
        })
    }

    /// Profiles bundled with the planner.
    pub fn builtin() -> Self {
        let profiles = builtin_profiles();
        let profiles = profiles
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            profiles,
            default_id: "potensic_atom_2".to_string(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: RegistryDocument =
            serde_json::from_str(json).map_err(|e| Error::ProfileFormat(e.to_string()))?;
        if doc.profiles.is_empty() {
            return Err(Error::ProfileFormat("no profiles defined".to_string()));
        }

        let mut ids: Vec<String> = doc.profiles.keys().cloned().collect();
        ids.sort();
        let default_id = match doc.default_profile {
            Some(id) => id,
            None => ids[0].clone(),
        };

        let profiles = doc
            .profiles
            .into_iter()
            .map(|(id, entry)| entry.into_profile(id))
            .collect();
        Self::new(profiles, default_id)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ProfileFormat(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: &str) -> Result<&DroneProfile> {
        self.profiles.get(id).ok_or_else(|| Error::ProfileNotFound {
            id: id.to_string(),
            available: self.ids(),
        })
    }

    /// Sorted profile ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.profiles.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn default_profile(&self) -> &DroneProfile {
        // Constructors guarantee the default id is present.
        &self.profiles[&self.default_id]
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn builtin_profiles() -> Vec<DroneProfile> {
    vec![
        DroneProfile {
            id: "generic".to_string(),
            name: "Generic Drone".to_string(),
            sensor_width_mm: 6.17,
            sensor_height_mm: 4.63,
            focal_length_mm: 4.5,
            image_width_px: 4000,
            image_height_px: 3000,
            max_flight_time_min: 32.0,
            cruise_speed_mps: 8.0,
            max_speed_mps: 15.0,
            max_altitude_m: 120.0,
            hover_accuracy_m: 0.5,
        },
        DroneProfile {
            id: "potensic_atom_2".to_string(),
            name: "Potensic Atom 2".to_string(),
            sensor_width_mm: 6.4,
            sensor_height_mm: 4.8,
            focal_length_mm: 4.7,
            image_width_px: 8000,
            image_height_px: 6000,
            max_flight_time_min: 32.0,
            cruise_speed_mps: 8.0,
            max_speed_mps: 16.0,
            max_altitude_m: 120.0,
            hover_accuracy_m: 0.5,
        },
        DroneProfile {
            id: "dji_mini_3_pro".to_string(),
            name: "DJI Mini 3 Pro".to_string(),
            sensor_width_mm: 9.6,
            sensor_height_mm: 7.2,
            focal_length_mm: 6.72,
            image_width_px: 4032,
            image_height_px: 3024,
            max_flight_time_min: 34.0,
            cruise_speed_mps: 10.0,
            max_speed_mps: 16.0,
            max_altitude_m: 120.0,
            hover_accuracy_m: 0.3,
        },
        DroneProfile {
            id: "dji_phantom_4_pro".to_string(),
            name: "DJI Phantom 4 Pro".to_string(),
            sensor_width_mm: 13.2,
            sensor_height_mm: 8.8,
            focal_length_mm: 8.8,
            image_width_px: 5472,
            image_height_px: 3648,
            max_flight_time_min: 30.0,
            cruise_speed_mps: 10.0,
            max_speed_mps: 20.0,
            max_altitude_m: 120.0,
            hover_accuracy_m: 0.3,
        },
    ]
}
