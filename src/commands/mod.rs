//! Command layer consumed by presentation front-ends
//!
//! Thin wrappers over the engine and solver that speak plain values and
//! `String` errors, so a dashboard or CLI never touches the error types.

use crate::engine::{self, Assessment};
use crate::geometry::{self, RegionPoint};
use crate::models::{HrZone, SolveRequest, SolveResult, Strategy, ZoneMinutes};
use crate::settings::SolverSettings;
use crate::solver;

/// Upper bound on region samples per request
const MAX_REGION_SAMPLES: usize = 1000;

/// ---------------------------------------------------------------------------
/// Engine Commands
/// ---------------------------------------------------------------------------

pub fn evaluate_pi(z1: f64, z2: f64, z3: f64) -> Result<f64, String> {
  let minutes = ZoneMinutes::new(z1, z2, z3).map_err(|e| e.to_string())?;
  Ok(engine::evaluate_minutes(&minutes))
}

pub fn assess_distribution(z1: f64, z2: f64, z3: f64) -> Result<Assessment, String> {
  let minutes = ZoneMinutes::new(z1, z2, z3).map_err(|e| e.to_string())?;
  Ok(engine::assess(&minutes))
}

/// Assess a week entered as total volume plus Z1/Z2 percentages
pub fn assess_percentages(
  total_volume: f64,
  z1_pct: f64,
  z2_pct: f64,
) -> Result<Assessment, String> {
  let minutes =
    ZoneMinutes::from_percentages(total_volume, z1_pct, z2_pct).map_err(|e| e.to_string())?;
  Ok(engine::assess(&minutes))
}

/// Assess minutes logged against the five-zone HR model
pub fn assess_hr_minutes(entries: &[(HrZone, f64)]) -> Result<Assessment, String> {
  let minutes = ZoneMinutes::from_hr_zone_minutes(entries).map_err(|e| e.to_string())?;
  Ok(engine::assess(&minutes))
}

/// Assess a raw HR stream sampled every `sample_secs` seconds
pub fn assess_hr_stream(
  samples_bpm: &[f64],
  max_hr: f64,
  sample_secs: f64,
) -> Result<Assessment, String> {
  let minutes = ZoneMinutes::from_heart_rate_stream(samples_bpm, max_hr, sample_secs)
    .map_err(|e| e.to_string())?;
  tracing::info!(samples = samples_bpm.len(), total_minutes = minutes.total(), "binned HR stream");
  Ok(engine::assess(&minutes))
}

/// ---------------------------------------------------------------------------
/// Solver Commands
/// ---------------------------------------------------------------------------

pub fn solve_zones(request: SolveRequest) -> Result<SolveResult, String> {
  tracing::info!(
    strategy = request.strategy.name(),
    target_pi = request.target_pi,
    "solving zone plan"
  );
  solver::solve(&request).map_err(|e| format!("Invalid solve request: {}", e))
}

/// Same as [`solve_zones`] with the request and result as JSON
pub fn solve_zones_json(request_json: &str) -> Result<String, String> {
  let request: SolveRequest = serde_json::from_str(request_json)
    .map_err(|e| format!("Failed to parse solve request: {}", e))?;
  let result = solve_zones(request)?;
  serde_json::to_string(&result).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Build a request, filling the target and strategy parameters from settings
pub fn solve_with_settings(
  settings: &SolverSettings,
  done: ZoneMinutes,
  target_pi: Option<f64>,
  strategy: Option<Strategy>,
) -> Result<SolveResult, String> {
  solve_zones(SolveRequest {
    done_minutes: done,
    target_pi: target_pi.unwrap_or(settings.target_pi),
    strategy: strategy.unwrap_or_else(|| settings.fixed_ratio_strategy()),
  })
}

/// ---------------------------------------------------------------------------
/// Geometry and Settings
/// ---------------------------------------------------------------------------

pub fn feasible_region(target_pi: f64, samples: usize) -> Result<Vec<RegionPoint>, String> {
  if !target_pi.is_finite() {
    return Err(format!("Target PI must be finite, got {}", target_pi));
  }
  if samples > MAX_REGION_SAMPLES {
    return Err(format!(
      "Too many samples: {} (max {})",
      samples, MAX_REGION_SAMPLES
    ));
  }
  Ok(geometry::sample_region(target_pi, samples))
}

pub fn get_solver_settings() -> Result<SolverSettings, String> {
  SolverSettings::from_env().map_err(|e| format!("Failed to load settings: {}", e))
}
