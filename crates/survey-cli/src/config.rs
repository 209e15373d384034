//! CLI configuration from environment.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON profile registry; builtin profiles when unset
    pub profiles_path: Option<PathBuf>,
    /// Profile used when `--profile` is not given; registry default when unset
    pub default_profile: Option<String>,
    pub out_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            profiles_path: lookup("SURVEY_PROFILES")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            default_profile: lookup("SURVEY_PROFILE").filter(|s| !s.is_empty()),
            out_dir: lookup("SURVEY_OUT_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("missions")),
        }
    }
}

/// Accept a mission name only if it is usable as a single path component.
pub fn parse_mission_name(name: &str) -> Result<String, String> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(format!("`{}` is not a usable mission name", name));
    }
    if name.contains(['/', '\\']) {
        return Err(format!("mission name `{}` must not contain path separators", name));
    }
    Ok(name.to_string())
}
