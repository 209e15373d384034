//! Survey planner CLI.
//!
//! Plans lawn-mower photo surveys and writes waypoint files for flight apps.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use survey_cli::{config::parse_mission_name, report, AreaArgs, Config};
use survey_core::{
    estimate_mission, plan_mission, ExportFormat, MappingParameters, PlannerConfig,
    ProfileRegistry,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Lossless JSON waypoint list
    Json,
    /// KML for Google Earth and other viewers
    Kml,
    /// Litchi mission CSV, one file per flight
    Litchi,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Kml => ExportFormat::Kml,
            OutputFormat::Litchi => ExportFormat::Litchi,
        }
    }
}

/// Photo-survey mission planner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Drone profile registry (JSON); defaults to the builtin profiles
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available drone profiles
    Profiles,
    /// Print mission statistics without writing files
    Estimate {
        #[command(flatten)]
        mission: MissionArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plan a mission and write flight files
    Plan {
        #[command(flatten)]
        mission: MissionArgs,

        /// Output formats to write
        #[arg(long, value_enum, value_delimiter = ',', default_value = "json,kml,litchi")]
        format: Vec<OutputFormat>,

        /// Output directory (default: $SURVEY_OUT_DIR or ./missions)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Mission name, also used as the directory and file stem
        #[arg(long, value_parser = parse_mission_name)]
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
struct MissionArgs {
    #[command(flatten)]
    area: AreaArgs,

    /// Drone profile id (see `survey profiles`)
    #[arg(long)]
    profile: Option<String>,

    /// Flight altitude in meters; solved from --gsd when omitted
    #[arg(long, conflicts_with = "gsd")]
    altitude: Option<f64>,

    /// Target ground sample distance in cm/px
    #[arg(long)]
    gsd: Option<f64>,

    /// Forward overlap percent
    #[arg(long, default_value_t = 70.0)]
    forward_overlap: f64,

    /// Side overlap percent
    #[arg(long, default_value_t = 60.0)]
    side_overlap: f64,

    /// Ground speed in m/s instead of the profile cruise speed
    #[arg(long)]
    speed: Option<f64>,

    /// Gimbal pitch in degrees (-90 = straight down)
    #[arg(long, default_value_t = -90.0, allow_hyphen_values = true)]
    gimbal_pitch: f64,

    /// Usable fraction of rated battery time
    #[arg(long, default_value_t = 0.8)]
    reserve: f64,
}

impl MissionArgs {
    fn params(&self) -> MappingParameters {
        let defaults = MappingParameters::default();
        MappingParameters {
            altitude_m: self.altitude,
            forward_overlap_pct: self.forward_overlap,
            side_overlap_pct: self.side_overlap,
            target_gsd_cm: self.gsd.unwrap_or(defaults.target_gsd_cm),
            speed_override_mps: self.speed,
            gimbal_pitch_deg: self.gimbal_pitch,
        }
    }

    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::default().with_reserve_fraction(self.reserve)
    }

    fn profile_id<'a>(&'a self, config: &'a Config, registry: &'a ProfileRegistry) -> &'a str {
        self.profile
            .as_deref()
            .or(config.default_profile.as_deref())
            .unwrap_or_else(|| registry.default_id())
    }
}

fn load_registry(cli_path: Option<&PathBuf>, config: &Config) -> Result<ProfileRegistry> {
    match cli_path.or(config.profiles_path.as_ref()) {
        Some(path) => ProfileRegistry::from_json_file(path)
            .with_context(|| format!("loading drone profiles from {}", path.display())),
        None => Ok(ProfileRegistry::builtin()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("survey_cli=info".parse()?)
                .add_directive("survey_core=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let registry = load_registry(cli.profiles.as_ref(), &config)?;

    match cli.command {
        Command::Profiles => {
            println!("\nAvailable Drone Profiles:");
            println!("{}", "=".repeat(50));
            for id in registry.ids() {
                let profile = registry.get(&id)?;
                println!();
                for line in report::profile_lines(profile, id == registry.default_id()) {
                    println!("{}", line);
                }
            }
            println!("\n{}", "=".repeat(50));
        }

        Command::Estimate { mission, json } => {
            let area = mission.area.to_area()?;
            let profile_id = mission.profile_id(&config, &registry);
            let summary = estimate_mission(
                &registry,
                profile_id,
                &area,
                &mission.params(),
                &mission.planner_config(),
            )
            .context("estimating mission")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for line in report::summary_lines(&summary) {
                    println!("{}", line);
                }
            }
        }

        Command::Plan {
            mission,
            format,
            out_dir,
            name,
        } => {
            let area = mission.area.to_area()?;
            let profile_id = mission.profile_id(&config, &registry);
            tracing::info!(profile = profile_id, "Planning mission");

            let plan = plan_mission(
                &registry,
                profile_id,
                &area,
                &mission.params(),
                &mission.planner_config(),
            )
            .context("planning mission")?;

            let name = name
                .unwrap_or_else(|| format!("Mapping_{}", Local::now().format("%Y%m%d_%H%M%S")));
            let dir = out_dir.unwrap_or_else(|| config.out_dir.clone()).join(&name);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;

            for line in report::summary_lines(&plan.summary) {
                println!("{}", line);
            }
            for line in report::flight_lines(&plan.segments) {
                println!("{}", line);
            }

            println!("\nFiles written:");
            for fmt in format {
                let paths = plan
                    .export(fmt.into(), &dir, &name, &name)
                    .with_context(|| format!("exporting {:?}", fmt))?;
                for path in paths {
                    println!("  {}", path.display());
                }
            }
        }
    }

    Ok(())
}
