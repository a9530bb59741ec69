//! Command-line front-end
//!
//! Every subcommand prints its result as JSON on stdout.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands;
use crate::models::{HrZone, Strategy, ZoneMinutes};
use crate::settings::SolverSettings;

#[derive(Debug, Parser)]
#[command(name = "polarization-index", version, about = "Polarization Index calculator and zone solver")]
pub struct Cli {
  /// Pretty-print JSON output
  #[arg(long, global = true)]
  pub pretty: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Polarization Index of a week
  Evaluate(MinutesArgs),
  /// PI, classification and per-zone breakdown
  Assess(AssessArgs),
  /// Assess minutes logged in the five heart rate zones
  AssessHr(HrMinutesArgs),
  /// Assess a heart rate stream
  AssessStream {
    #[arg(long)]
    max_hr: f64,
    /// Seconds between samples
    #[arg(long, default_value_t = 1.0)]
    sample_secs: f64,
    /// Comma-separated readings in bpm
    #[arg(long, value_delimiter = ',', required = true)]
    bpm: Vec<f64>,
  },
  /// Minutes to add to reach a target PI
  Solve(SolveArgs),
  /// Solve a JSON request
  SolveJson {
    /// SolveRequest as JSON
    request: String,
  },
  /// Isocline and physical bounds sampled over f1
  Region {
    #[arg(long)]
    target: Option<f64>,
    #[arg(long, default_value_t = 21)]
    samples: usize,
  },
  /// Effective solver settings
  Settings,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct MinutesArgs {
  #[arg(long, default_value_t = 0.0)]
  pub z1: f64,
  #[arg(long, default_value_t = 0.0)]
  pub z2: f64,
  #[arg(long, default_value_t = 0.0)]
  pub z3: f64,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct AssessArgs {
  #[command(flatten)]
  pub minutes: MinutesArgs,
  /// Weekly volume; with percentages instead of per-zone minutes
  #[arg(long, requires_all = ["z1_pct", "z2_pct"])]
  pub volume: Option<f64>,
  #[arg(long)]
  pub z1_pct: Option<f64>,
  #[arg(long)]
  pub z2_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct HrMinutesArgs {
  #[arg(long, default_value_t = 0.0)]
  pub hr1: f64,
  #[arg(long, default_value_t = 0.0)]
  pub hr2: f64,
  #[arg(long, default_value_t = 0.0)]
  pub hr3: f64,
  #[arg(long, default_value_t = 0.0)]
  pub hr4: f64,
  #[arg(long, default_value_t = 0.0)]
  pub hr5: f64,
}

impl HrMinutesArgs {
  fn entries(&self) -> [(HrZone, f64); 5] {
    [
      (HrZone::Z1, self.hr1),
      (HrZone::Z2, self.hr2),
      (HrZone::Z3, self.hr3),
      (HrZone::Z4, self.hr4),
      (HrZone::Z5, self.hr5),
    ]
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
  FixedRatio,
  FixedDeltaZ3,
  Minimize,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct SolveArgs {
  #[command(flatten)]
  pub done: MinutesArgs,
  #[arg(long)]
  pub target: Option<f64>,
  #[arg(long, value_enum, default_value_t = StrategyKind::FixedRatio)]
  pub strategy: StrategyKind,
  /// Z1 share for fixed-ratio (defaults to settings)
  #[arg(long)]
  pub ratio: Option<f64>,
  /// Z3 minutes to add for fixed-delta-z3 (defaults to settings)
  #[arg(long)]
  pub delta: Option<f64>,
}

impl SolveArgs {
  fn resolve_strategy(&self, settings: &SolverSettings) -> Strategy {
    match self.strategy {
      StrategyKind::FixedRatio => self
        .ratio
        .map_or_else(|| settings.fixed_ratio_strategy(), |ratio| Strategy::FixedRatio { ratio }),
      StrategyKind::FixedDeltaZ3 => self
        .delta
        .map_or_else(|| settings.fixed_delta_strategy(), |delta| Strategy::FixedDeltaZ3 { delta }),
      StrategyKind::Minimize => Strategy::MinimizeAddedTime,
    }
  }
}

/// Run one parsed command and render its JSON output
pub fn dispatch(cli: &Cli, settings: &SolverSettings) -> Result<String, String> {
  let value = match &cli.command {
    Command::Evaluate(m) => serde_json::json!({ "pi": commands::evaluate_pi(m.z1, m.z2, m.z3)? }),
    Command::Assess(args) => {
      let assessment = match (args.volume, args.z1_pct, args.z2_pct) {
        (Some(volume), Some(z1_pct), Some(z2_pct)) => {
          commands::assess_percentages(volume, z1_pct, z2_pct)?
        }
        _ => commands::assess_distribution(args.minutes.z1, args.minutes.z2, args.minutes.z3)?,
      };
      to_value(&assessment)?
    }
    Command::AssessHr(args) => to_value(&commands::assess_hr_minutes(&args.entries())?)?,
    Command::AssessStream {
      max_hr,
      sample_secs,
      bpm,
    } => to_value(&commands::assess_hr_stream(bpm, *max_hr, *sample_secs)?)?,
    Command::Solve(args) => {
      let done = ZoneMinutes {
        z1: args.done.z1,
        z2: args.done.z2,
        z3: args.done.z3,
      };
      let result =
        commands::solve_with_settings(settings, done, args.target, Some(args.resolve_strategy(settings)))?;
      to_value(&result)?
    }
    Command::SolveJson { request } => {
      let out = commands::solve_zones_json(request)?;
      serde_json::from_str(&out).map_err(|e| e.to_string())?
    }
    Command::Region { target, samples } => {
      let points = commands::feasible_region(target.unwrap_or(settings.target_pi), *samples)?;
      to_value(&points)?
    }
    Command::Settings => to_value(settings)?,
  };

  let rendered = if cli.pretty {
    serde_json::to_string_pretty(&value)
  } else {
    serde_json::to_string(&value)
  };
  rendered.map_err(|e| format!("Failed to render output: {}", e))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, String> {
  serde_json::to_value(value).map_err(|e| format!("Failed to serialize output: {}", e))
}
