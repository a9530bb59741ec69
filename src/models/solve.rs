use serde::{Deserialize, Serialize};

use super::zones::ZoneMinutes;

/// Default Z1 share pinned by the fixed-ratio strategy
pub const DEFAULT_FIXED_RATIO: f64 = 0.8;

fn default_ratio() -> f64 {
  DEFAULT_FIXED_RATIO
}

/// ---------------------------------------------------------------------------
/// Strategy Selection
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
  /// Pin the Z1 share and scale the whole week up until every zone covers
  /// what is already done
  FixedRatio {
    #[serde(default = "default_ratio")]
    ratio: f64,
  },
  /// Add a fixed amount of Z3, then balance with Z2 or Z1
  FixedDeltaZ3 { delta: f64 },
  /// Cheapest single-zone move
  MinimizeAddedTime,
}

impl Default for Strategy {
  fn default() -> Self {
    Strategy::FixedRatio {
      ratio: DEFAULT_FIXED_RATIO,
    }
  }
}

impl Strategy {
  pub fn name(&self) -> &'static str {
    match self {
      Strategy::FixedRatio { .. } => "fixed_ratio",
      Strategy::FixedDeltaZ3 { .. } => "fixed_delta_z3",
      Strategy::MinimizeAddedTime => "minimize_added_time",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
  pub done_minutes: ZoneMinutes,
  pub target_pi: f64,
  #[serde(default)]
  pub strategy: Strategy,
}

/// ---------------------------------------------------------------------------
/// Solve Outcome
/// ---------------------------------------------------------------------------

/// Which branch produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rationale {
  /// Nothing logged yet, there is no distribution to adjust
  NoData,
  /// Fixed ratio met by scaling total volume
  ScaledToRatio,
  /// No non-negative split exists for the pinned Z1 share
  RatioInfeasible,
  AdjustedZ1,
  AdjustedZ2,
  AdjustedZ3,
  /// Neither Z2 nor Z1 can balance the chosen Z3 volume
  UnreachableAtZ3,
  /// No single-zone move reaches the target without dropping below done
  NoSingleZoneSolution,
}

impl Rationale {
  pub fn message(&self) -> &'static str {
    match self {
      Rationale::NoData => "no training logged yet",
      Rationale::ScaledToRatio => "scaled total volume to hold the fixed Z1 share",
      Rationale::RatioInfeasible => "target PI cannot be reached with this Z1 share",
      Rationale::AdjustedZ1 => "optimised by adding Z1",
      Rationale::AdjustedZ2 => "optimised by adding Z2",
      Rationale::AdjustedZ3 => "optimised by adding Z3",
      Rationale::UnreachableAtZ3 => "target unreachable at this Z3 - raise Z3 or lower target PI",
      Rationale::NoSingleZoneSolution => "no single-zone addition reaches the target PI",
    }
  }
}

impl std::fmt::Display for Rationale {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
  pub final_minutes: ZoneMinutes,
  /// final - done, every component >= 0
  pub added_minutes: ZoneMinutes,
  pub achieved_pi: f64,
  pub feasible: bool,
  pub rationale: Rationale,
}

impl SolveResult {
  pub fn solved(done: &ZoneMinutes, final_minutes: ZoneMinutes, rationale: Rationale) -> Self {
    Self {
      final_minutes,
      added_minutes: final_minutes.added_over(done),
      achieved_pi: crate::engine::evaluate_minutes(&final_minutes),
      feasible: true,
      rationale,
    }
  }

  /// Leaves the done minutes untouched
  pub fn unsolved(done: &ZoneMinutes, rationale: Rationale) -> Self {
    Self {
      final_minutes: *done,
      added_minutes: ZoneMinutes::ZERO,
      achieved_pi: crate::engine::evaluate_minutes(done),
      feasible: false,
      rationale,
    }
  }

  pub fn total_added(&self) -> f64 {
    self.added_minutes.total()
  }
}
