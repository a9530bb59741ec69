//! Zone Solver
//!
//! Given minutes already done this week and a target Polarization Index,
//! find how much to add to each zone. Done minutes are lower bounds: a
//! feasible plan never asks to remove time.
//!
//! Strategies:
//! - FixedRatio: pin the Z1 share, solve the split in closed form, then grow
//!   the total volume until every zone covers what is already done
//! - FixedDeltaZ3: commit a fixed Z3 addition, balance it with Z2 or Z1
//! - MinimizeAddedTime: cheapest single-zone move
//!
//! MinimizeAddedTime only considers moving one zone at a time. It is not a
//! joint minimiser over all three zones.

use crate::engine::F2_EPSILON;
use crate::error::PiError;
use crate::inverse::{
  check_on_target, checked_ratio, solve_z1, solve_z2, solve_z3, z1_asymptote, Infeasibility,
};
use crate::models::{Rationale, SolveRequest, SolveResult, Strategy, Zone, ZoneMinutes};

/// Relative slack when comparing a solved zone against its done minutes, so a
/// week already on target is not rejected over rounding
const FLOOR_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
/// Entry Point
// ---------------------------------------------------------------------------

/// Validate a request and dispatch it to its strategy.
///
/// Errors only for invalid parameters. An unreachable target is a normal
/// result with `feasible == false`.
pub fn solve(request: &SolveRequest) -> Result<SolveResult, PiError> {
  let done = &request.done_minutes;
  done.validate()?;
  if !request.target_pi.is_finite() {
    return Err(PiError::InvalidTarget(request.target_pi));
  }
  validate_strategy(&request.strategy)?;

  if done.is_empty() {
    tracing::debug!(strategy = request.strategy.name(), "no done minutes, nothing to solve");
    return Ok(SolveResult::unsolved(done, Rationale::NoData));
  }

  let result = match request.strategy {
    Strategy::FixedRatio { ratio } => fixed_ratio(done, request.target_pi, ratio),
    Strategy::FixedDeltaZ3 { delta } => fixed_delta_z3(done, request.target_pi, delta),
    Strategy::MinimizeAddedTime => minimize_added_time(done, request.target_pi),
  };

  tracing::debug!(
    strategy = request.strategy.name(),
    target_pi = request.target_pi,
    feasible = result.feasible,
    rationale = ?result.rationale,
    added = result.total_added(),
    "solve complete"
  );

  Ok(result)
}

fn validate_strategy(strategy: &Strategy) -> Result<(), PiError> {
  match *strategy {
    Strategy::FixedRatio { ratio } => {
      if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
        return Err(PiError::InvalidRatio(ratio));
      }
    }
    Strategy::FixedDeltaZ3 { delta } => {
      if !delta.is_finite() || delta < 0.0 {
        return Err(PiError::InvalidDelta(delta));
      }
    }
    Strategy::MinimizeAddedTime => {}
  }
  Ok(())
}

// ---------------------------------------------------------------------------
/// Strategy A: Fixed Z1 Ratio
// ---------------------------------------------------------------------------

/// Pin f1 = `ratio`. With T = 1 the PI equation f1*f3 = K*f2 and
/// f2 = 1 - f1 - f3 give f3 = K(1 - f1) / (f1 + K).
///
/// Expects validated inputs (see [`solve`]).
pub fn fixed_ratio(done: &ZoneMinutes, target_pi: f64, ratio: f64) -> SolveResult {
  let k = match checked_ratio(target_pi) {
    Ok(k) => k,
    Err(reason) => {
      tracing::debug!(target_pi, reason = %reason, "no usable ratio for target");
      return SolveResult::unsolved(done, Rationale::RatioInfeasible);
    }
  };
  let f1 = ratio;
  let f3 = k * (1.0 - f1) / (f1 + k);
  let f2 = 1.0 - f1 - f3;

  if f2 < 0.0 || f3 < 0.0 {
    tracing::debug!(f1, f2, f3, "negative share for pinned ratio");
    return SolveResult::unsolved(done, Rationale::RatioInfeasible);
  }
  if f2 < F2_EPSILON {
    tracing::debug!(f2, "pinned ratio needs a Z2 share below the model floor");
    return SolveResult::unsolved(done, Rationale::RatioInfeasible);
  }

  // Smallest week in which every zone covers its done minutes
  let volume = (done.z1 / f1).max(done.z2 / f2).max(done.z3 / f3);
  if !volume.is_finite() {
    tracing::debug!(volume, f3, "covering volume overflows");
    return SolveResult::unsolved(done, Rationale::RatioInfeasible);
  }

  let final_minutes = ZoneMinutes {
    z1: (volume * f1).max(done.z1),
    z2: (volume * f2).max(done.z2),
    z3: (volume * f3).max(done.z3),
  };
  if let Err(reason) = check_on_target(&final_minutes, target_pi) {
    tracing::debug!(reason = %reason, "scaled week misses the target");
    return SolveResult::unsolved(done, Rationale::RatioInfeasible);
  }

  SolveResult::solved(done, final_minutes, Rationale::ScaledToRatio)
}

// ---------------------------------------------------------------------------
/// Strategy B: Fixed Z3 Addition
// ---------------------------------------------------------------------------

/// Add `delta` to Z3, then balance with either Z2 (Z1 held) or Z1 (Z2 held),
/// whichever costs less. Ties go to Z2.
pub fn fixed_delta_z3(done: &ZoneMinutes, target_pi: f64, delta: f64) -> SolveResult {
  let base = done.with(Zone::Z3, done.z3 + delta);

  let via_z2 = move_single_zone(Zone::Z2, &base, done, target_pi);
  let via_z1 = move_single_zone(Zone::Z1, &base, done, target_pi);

  match cheapest([via_z2, via_z1]) {
    Some(best) => SolveResult::solved(done, best.final_minutes, adjusted(best.zone)),
    None => {
      tracing::debug!(
        z3_final = base.z3,
        z1_asymptote = z1_asymptote(base.z2, target_pi),
        "target unreachable at this Z3"
      );
      SolveResult::unsolved(done, Rationale::UnreachableAtZ3)
    }
  }
}

// ---------------------------------------------------------------------------
/// Strategy C: Cheapest Single-Zone Move
// ---------------------------------------------------------------------------

/// Try moving only Z1, only Z2, only Z3; keep the smallest addition.
/// Ties go to the lower zone.
pub fn minimize_added_time(done: &ZoneMinutes, target_pi: f64) -> SolveResult {
  let candidates = Zone::ALL.map(|zone| move_single_zone(zone, done, done, target_pi));

  match cheapest(candidates) {
    Some(best) => SolveResult::solved(done, best.final_minutes, adjusted(best.zone)),
    None => SolveResult::unsolved(done, Rationale::NoSingleZoneSolution),
  }
}

// ---------------------------------------------------------------------------
/// Candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Candidate {
  zone: Zone,
  final_minutes: ZoneMinutes,
  /// Minutes added to `zone` on top of its done value
  cost: f64,
}

fn solve_zone(zone: Zone, base: &ZoneMinutes, target_pi: f64) -> Result<f64, Infeasibility> {
  match zone {
    Zone::Z1 => solve_z1(base.z2, base.z3, target_pi),
    Zone::Z2 => solve_z2(base.z1, base.z3, target_pi),
    Zone::Z3 => solve_z3(base.z1, base.z2, target_pi),
  }
}

/// Solve `zone` with the other two held at `base`, rejecting solutions
/// below the zone's done minutes
fn move_single_zone(
  zone: Zone,
  base: &ZoneMinutes,
  done: &ZoneMinutes,
  target_pi: f64,
) -> Option<Candidate> {
  let floor = done.get(zone);
  match solve_zone(zone, base, target_pi) {
    Ok(value) if value >= floor - FLOOR_TOLERANCE * floor.max(1.0) => {
      let value = value.max(floor);
      Some(Candidate {
        zone,
        final_minutes: base.with(zone, value),
        cost: value - floor,
      })
    }
    Ok(value) => {
      tracing::debug!(zone = %zone, value, floor, "candidate below done minutes");
      None
    }
    Err(reason) => {
      tracing::debug!(zone = %zone, reason = %reason, "candidate infeasible");
      None
    }
  }
}

/// First candidate wins ties
fn cheapest<I>(candidates: I) -> Option<Candidate>
where
  I: IntoIterator<Item = Option<Candidate>>,
{
  candidates
    .into_iter()
    .flatten()
    .fold(None, |best: Option<Candidate>, c| match best {
      Some(b) if b.cost <= c.cost => Some(b),
      _ => Some(c),
    })
}

fn adjusted(zone: Zone) -> Rationale {
  match zone {
    Zone::Z1 => Rationale::AdjustedZ1,
    Zone::Z2 => Rationale::AdjustedZ2,
    Zone::Z3 => Rationale::AdjustedZ3,
  }
}
