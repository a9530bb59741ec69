//! Inverse relations of the Polarization Index
//!
//! Each solver holds two zones fixed and finds the third so that the week
//! lands exactly on a target PI. With K = 10^PI / 100 the defining equation is
//!
//!   z1 * z3 = K * z2 * (z1 + z2 + z3)
//!
//! which is quadratic in z2 and linear in z1 and z3.

use serde::{Deserialize, Serialize};

use crate::engine::{evaluate_minutes, F2_EPSILON};
use crate::models::ZoneMinutes;

/// Why an inverse relation has no admissible solution
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Infeasibility {
  #[error("target PI has no finite, normal ratio K")]
  TargetOutOfRange,

  #[error("quadratic in Z2 has no real root (discriminant {discriminant})")]
  NegativeDiscriminant { discriminant: f64 },

  #[error("past the asymptote: denominator {denominator} <= 0")]
  Asymptote { denominator: f64 },

  #[error("fixed zones leave no polarization signal to balance")]
  DegenerateFixedZones,

  #[error("solution has no non-negative finite value")]
  NoNonNegativeRoot,

  #[error("Z2 share {z2_share} falls below the model floor")]
  BeyondModelResolution { z2_share: f64 },

  #[error("solution evaluates to PI {achieved_pi}, off the target")]
  OffTarget { achieved_pi: f64 },
}

/// Largest gap between the forward PI of a solution and its target
pub const PI_TOLERANCE: f64 = 1e-9;

/// K = 10^PI / 100, the value of (f1 / f2) * f3 implied by a target
pub fn target_ratio(target_pi: f64) -> f64 {
  10f64.powf(target_pi) / 100.0
}

/// K for a target, rejected when 10^PI overflows, underflows to zero or
/// loses precision as a subnormal
pub fn checked_ratio(target_pi: f64) -> Result<f64, Infeasibility> {
  let k = target_ratio(target_pi);
  if !target_pi.is_finite() || !k.is_normal() {
    return Err(Infeasibility::TargetOutOfRange);
  }
  Ok(k)
}

/// Forward PI of `week` must land within [`PI_TOLERANCE`] of the target
pub fn check_on_target(week: &ZoneMinutes, target_pi: f64) -> Result<(), Infeasibility> {
  let achieved_pi = evaluate_minutes(week);
  let gap = (achieved_pi - target_pi).abs();
  if gap.is_nan() || gap > PI_TOLERANCE {
    return Err(Infeasibility::OffTarget { achieved_pi });
  }
  Ok(())
}

/// Final gate shared by all three solvers: the value must be a real
/// non-negative magnitude, the resulting week must stay above the Z2 floor,
/// and the forward model must reproduce the target.
fn admit(value: f64, week: ZoneMinutes, target_pi: f64) -> Result<f64, Infeasibility> {
  if !value.is_finite() || value < 0.0 {
    return Err(Infeasibility::NoNonNegativeRoot);
  }
  let total = week.total();
  let z2_share = if total > 0.0 { week.z2 / total } else { 0.0 };
  if z2_share < F2_EPSILON {
    return Err(Infeasibility::BeyondModelResolution { z2_share });
  }
  check_on_target(&week, target_pi)?;
  Ok(value)
}

/// Z2 that hits the target with Z1 and Z3 fixed.
///
/// Solves K*z2^2 + K*(z1+z3)*z2 - z1*z3 = 0 and keeps the non-negative root.
pub fn solve_z2(z1: f64, z3: f64, target_pi: f64) -> Result<f64, Infeasibility> {
  let k = checked_ratio(target_pi)?;
  let b = k * (z1 + z3);
  let c = z1 * z3;
  let discriminant = b * b + 4.0 * k * c;
  if discriminant < 0.0 {
    return Err(Infeasibility::NegativeDiscriminant { discriminant });
  }
  if z1 <= 0.0 || z3 <= 0.0 {
    return Err(Infeasibility::DegenerateFixedZones);
  }

  // (-b + sqrt(D)) / 2K rewritten to avoid cancellation when 4Kc << b^2
  let z2 = 2.0 * c / (b + discriminant.sqrt());
  admit(z2, ZoneMinutes { z1, z2, z3 }, target_pi)
}

/// Z1 that hits the target with Z2 and Z3 fixed.
///
/// z1 * (z3 - K*z2) = K*z2*(z2 + z3); needs z3 > K*z2.
pub fn solve_z1(z2: f64, z3: f64, target_pi: f64) -> Result<f64, Infeasibility> {
  let k = checked_ratio(target_pi)?;
  if z2 <= 0.0 {
    return Err(Infeasibility::DegenerateFixedZones);
  }
  let denominator = z3 - k * z2;
  if denominator <= 0.0 {
    return Err(Infeasibility::Asymptote { denominator });
  }

  let z1 = k * z2 * (z2 + z3) / denominator;
  admit(z1, ZoneMinutes { z1, z2, z3 }, target_pi)
}

/// Z3 that hits the target with Z1 and Z2 fixed.
///
/// z3 * (z1 - K*z2) = K*z2*(z2 + z1); needs z1 > K*z2.
pub fn solve_z3(z1: f64, z2: f64, target_pi: f64) -> Result<f64, Infeasibility> {
  let k = checked_ratio(target_pi)?;
  if z2 <= 0.0 {
    return Err(Infeasibility::DegenerateFixedZones);
  }
  let denominator = z1 - k * z2;
  if denominator <= 0.0 {
    return Err(Infeasibility::Asymptote { denominator });
  }

  let z3 = k * z2 * (z2 + z1) / denominator;
  admit(z3, ZoneMinutes { z1, z2, z3 }, target_pi)
}

/// Z3 level at or below which no amount of Z1 reaches the target
pub fn z1_asymptote(z2: f64, target_pi: f64) -> f64 {
  target_ratio(target_pi) * z2
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::engine::evaluate;
  use proptest::prelude::*;

  #[test]
  fn test_target_ratio_at_threshold_is_one() {
    assert_approx_eq!(target_ratio(2.0), 1.0, 1e-12);
    assert_approx_eq!(target_ratio(3.0), 10.0, 1e-12);
  }

  #[test]
  fn test_solve_z2_round_trip() {
    // 240/?/30 toward PI 2.0: z2^2 + 270 z2 - 7200 = 0
    let z2 = solve_z2(240.0, 30.0, 2.0).unwrap();
    assert_approx_eq!(z2, 24.4522, 1e-4);
    assert_approx_eq!(evaluate(240.0, z2, 30.0), 2.0, 1e-6);
  }

  #[test]
  fn test_solve_z1_round_trip() {
    // K = 1: z1 * (45 - 20) = 20 * 65
    let z1 = solve_z1(20.0, 45.0, 2.0).unwrap();
    assert_approx_eq!(z1, 52.0, 1e-9);
    assert_approx_eq!(evaluate(z1, 20.0, 45.0), 2.0, 1e-6);
  }

  #[test]
  fn test_solve_z3_round_trip() {
    let z3 = solve_z3(120.0, 20.0, 2.5).unwrap();
    assert_approx_eq!(z3, 156.012, 1e-3);
    assert_approx_eq!(evaluate(120.0, 20.0, z3), 2.5, 1e-6);
  }

  #[test]
  fn test_solve_z1_past_asymptote_is_infeasible() {
    // K(3.5) = 31.6, so K * z2 = 632 > z3
    let result = solve_z1(20.0, 45.0, 3.5);
    assert!(matches!(result, Err(Infeasibility::Asymptote { denominator }) if denominator < 0.0));
  }

  #[test]
  fn test_solve_z1_exactly_on_asymptote_is_infeasible() {
    // K(2.0) = 1 and z3 == z2
    assert!(matches!(
      solve_z1(30.0, 30.0, 2.0),
      Err(Infeasibility::Asymptote { denominator }) if denominator <= 0.0
    ));
  }

  #[test]
  fn test_solve_z3_past_asymptote_is_infeasible() {
    assert!(matches!(
      solve_z3(20.0, 30.0, 2.0),
      Err(Infeasibility::Asymptote { .. })
    ));
  }

  #[test]
  fn test_solve_z2_negative_discriminant() {
    // Outside the caller contract: (z1 + z3)^2 + 4 * z1 * z3 < 0
    let result = solve_z2(-1.0, 1.0, 2.0);
    assert!(matches!(result, Err(Infeasibility::NegativeDiscriminant { .. })));
  }

  #[test]
  fn test_solve_z2_without_z3_is_degenerate() {
    assert_eq!(
      solve_z2(120.0, 0.0, 2.0),
      Err(Infeasibility::DegenerateFixedZones)
    );
  }

  #[test]
  fn test_zero_z2_is_degenerate_for_linear_solvers() {
    assert_eq!(solve_z1(0.0, 30.0, 2.0), Err(Infeasibility::DegenerateFixedZones));
    assert_eq!(solve_z3(120.0, 0.0, 2.0), Err(Infeasibility::DegenerateFixedZones));
  }

  #[test]
  fn test_non_finite_target() {
    assert_eq!(solve_z2(1.0, 1.0, f64::NAN), Err(Infeasibility::TargetOutOfRange));
    assert_eq!(solve_z1(1.0, 1.0, f64::INFINITY), Err(Infeasibility::TargetOutOfRange));
  }

  #[test]
  fn test_extreme_finite_targets_are_out_of_range() {
    // 10^400 overflows, 10^-400 underflows to zero, 10^-310 is subnormal
    for pi in [400.0, -400.0, -310.0] {
      assert_eq!(checked_ratio(pi), Err(Infeasibility::TargetOutOfRange));
      assert_eq!(solve_z2(120.0, 15.0, pi), Err(Infeasibility::TargetOutOfRange));
      assert_eq!(solve_z1(20.0, 15.0, pi), Err(Infeasibility::TargetOutOfRange));
      assert_eq!(solve_z3(120.0, 20.0, pi), Err(Infeasibility::TargetOutOfRange));
    }
    assert!(checked_ratio(300.0).is_ok());
  }

  #[test]
  fn test_check_on_target() {
    let week = ZoneMinutes { z1: 240.0, z2: 10.0, z3: 30.0 };
    let pi = evaluate(240.0, 10.0, 30.0);
    assert!(check_on_target(&week, pi).is_ok());
    assert!(matches!(
      check_on_target(&week, pi + 1e-6),
      Err(Infeasibility::OffTarget { achieved_pi }) if achieved_pi == pi
    ));
  }

  #[test]
  fn test_tiny_z2_beyond_resolution() {
    // A huge target squeezes Z2 below the epsilon floor
    let result = solve_z2(50.0, 50.0, 6.0);
    assert!(matches!(result, Err(Infeasibility::BeyondModelResolution { .. })));
  }

  #[test]
  fn test_z1_asymptote() {
    assert_approx_eq!(z1_asymptote(20.0, 2.0), 20.0, 1e-12);
    assert!(solve_z1(20.0, z1_asymptote(20.0, 2.5) + 1.0, 2.5).is_ok());
  }

  proptest! {
    #[test]
    fn solve_z2_round_trips(
      z1 in 1.0f64..500.0,
      z3 in 1.0f64..500.0,
      pi in 0.5f64..4.0,
    ) {
      if let Ok(z2) = solve_z2(z1, z3, pi) {
        prop_assert!(z2 >= 0.0);
        prop_assert!((evaluate(z1, z2, z3) - pi).abs() < 1e-6);
      }
    }

    #[test]
    fn solve_z1_is_never_finite_below_asymptote(
      z2 in 0.1f64..200.0,
      pi in 0.5f64..4.0,
      frac in 0.0f64..1.0,
    ) {
      let z3 = z1_asymptote(z2, pi) * frac;
      prop_assert!(solve_z1(z2, z3, pi).is_err());
    }
  }
}
