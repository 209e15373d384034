//! Survey CLI - Command line front end for the survey planner.
//!
//! The `survey` binary provides:
//! - profiles: list drone profiles
//! - estimate: print mission statistics
//! - plan: plan a mission and write flight files

pub mod area;
pub mod config;
pub mod report;

pub use area::AreaArgs;
pub use config::Config;
