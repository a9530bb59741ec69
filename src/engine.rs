//! Polarization Index engine
//!
//! Forward evaluation of the Polarization Index (Treff et al. 2019):
//!
//!   PI = log10((f1 / f2) * f3 * 100)
//!
//! where f1, f2, f3 are the shares of time spent in the low, threshold and
//! high intensity zones. Everything here is a pure function.

use serde::{Deserialize, Serialize};

use crate::models::{Zone, ZoneFractions, ZoneMinutes};

/// ---------------------------------------------------------------------------
/// Model Constants
/// ---------------------------------------------------------------------------

/// Floor applied to the Z2 share before dividing. A week with no threshold
/// work would otherwise have an infinite index.
pub const F2_EPSILON: f64 = 1e-4;

/// PI above this value is a polarized distribution
pub const POLARIZED_THRESHOLD: f64 = 2.0;

/// Returned when there is nothing to measure: zero total, or no Z1/Z3 time
pub const NO_SIGNAL_PI: f64 = 0.0;

/// ---------------------------------------------------------------------------
/// Forward Evaluation
/// ---------------------------------------------------------------------------

/// Polarization Index of raw zone minutes.
///
/// Inputs are expected to be >= 0. Negative inputs are not rejected and give
/// an unspecified (but finite, non-panicking) value; use
/// [`ZoneMinutes::new`] to validate first.
///
/// Returns [`NO_SIGNAL_PI`] when the total is zero or when the log argument
/// collapses to zero (no Z3 or no Z1 time).
pub fn evaluate(z1: f64, z2: f64, z3: f64) -> f64 {
  let total = z1 + z2 + z3;
  if total == 0.0 {
    return NO_SIGNAL_PI;
  }
  evaluate_fractions(&ZoneFractions {
    f1: z1 / total,
    f2: z2 / total,
    f3: z3 / total,
  })
}

pub fn evaluate_minutes(minutes: &ZoneMinutes) -> f64 {
  evaluate(minutes.z1, minutes.z2, minutes.z3)
}

/// Polarization Index from zone shares
pub fn evaluate_fractions(fractions: &ZoneFractions) -> f64 {
  let f2 = fractions.f2.max(F2_EPSILON);
  let arg = (fractions.f1 / f2) * fractions.f3 * 100.0;
  if !arg.is_finite() || arg <= 0.0 {
    return NO_SIGNAL_PI;
  }
  arg.log10()
}

/// ---------------------------------------------------------------------------
/// Classification
/// ---------------------------------------------------------------------------

/// Training intensity distribution class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TidClass {
  Polarized,
  /// Pyramidal or threshold-heavy
  Pyramidal,
}

impl TidClass {
  pub fn as_str(&self) -> &'static str {
    match self {
      TidClass::Polarized => "polarized",
      TidClass::Pyramidal => "pyramidal",
    }
  }

  pub fn guidance(&self) -> &'static str {
    match self {
      TidClass::Polarized => {
        "Polarized: favours VO2max development and nervous system recovery"
      }
      TidClass::Pyramidal => {
        "Pyramidal/threshold: favours VLaMax suppression and half-marathon efficiency"
      }
    }
  }
}

pub fn classify(pi: f64) -> TidClass {
  if pi > POLARIZED_THRESHOLD {
    TidClass::Polarized
  } else {
    TidClass::Pyramidal
  }
}

/// ---------------------------------------------------------------------------
/// Assessment
/// ---------------------------------------------------------------------------

/// One row of the per-zone breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRow {
  pub zone: Zone,
  pub minutes: f64,
  pub share: f64,
  pub effect: String,
}

/// Full read-out of a distribution for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
  pub pi: f64,
  /// None when no time is logged
  pub class: Option<TidClass>,
  pub guidance: Option<String>,
  pub zones: Vec<ZoneRow>,
}

pub fn assess(minutes: &ZoneMinutes) -> Assessment {
  let fractions = minutes.fractions();
  let pi = evaluate_minutes(minutes);
  let class = fractions.map(|_| classify(pi));

  let zones = Zone::ALL
    .iter()
    .map(|&zone| ZoneRow {
      zone,
      minutes: minutes.get(zone),
      share: fractions.map_or(0.0, |f| f.get(zone)),
      effect: zone.effect().to_string(),
    })
    .collect();

  Assessment {
    pi,
    class,
    guidance: class.map(|c| c.guidance().to_string()),
    zones,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use proptest::prelude::*;

  #[test]
  fn test_epsilon_is_pinned() {
    assert_eq!(F2_EPSILON, 1e-4);
    assert_eq!(POLARIZED_THRESHOLD, 2.0);
  }

  #[test]
  fn test_zero_total_is_exact_sentinel() {
    assert_eq!(evaluate(0.0, 0.0, 0.0), 0.0);
  }

  #[test]
  fn test_pyramidal_week() {
    // 120/20/15: ratio 6, Z3 share 0.0968 -> log10(58.06)
    let pi = evaluate(120.0, 20.0, 15.0);
    assert_approx_eq!(pi, 1.7639, 1e-4);
    assert_eq!(classify(pi), TidClass::Pyramidal);
  }

  #[test]
  fn test_polarized_week() {
    let pi = evaluate(240.0, 10.0, 30.0);
    assert!(pi > POLARIZED_THRESHOLD, "expected polarized, got {}", pi);
    assert_approx_eq!(pi, 2.4102, 1e-4);
    assert_eq!(classify(pi), TidClass::Polarized);
  }

  #[test]
  fn test_threshold_itself_is_pyramidal() {
    assert_eq!(classify(2.0), TidClass::Pyramidal);
    assert_eq!(classify(2.0 + 1e-9), TidClass::Polarized);
  }

  #[test]
  fn test_no_z3_returns_sentinel_not_nan() {
    let pi = evaluate(200.0, 40.0, 0.0);
    assert_eq!(pi, NO_SIGNAL_PI);
    assert!(!pi.is_nan());
  }

  #[test]
  fn test_no_z1_returns_sentinel_not_neg_infinity() {
    assert_eq!(evaluate(0.0, 40.0, 20.0), NO_SIGNAL_PI);
  }

  #[test]
  fn test_zero_z2_uses_epsilon_floor() {
    // 80/0/20: (0.8 / 1e-4) * 0.2 * 100
    let pi = evaluate(80.0, 0.0, 20.0);
    assert_approx_eq!(pi, (0.8 / F2_EPSILON * 0.2 * 100.0_f64).log10(), 1e-12);
    assert!(pi.is_finite());
  }

  #[test]
  fn test_negative_input_is_outside_contract() {
    // Unchecked path: no panic, no NaN leaking out
    let pi = evaluate(-10.0, 20.0, 30.0);
    assert!(pi.is_finite());
    // Checked path rejects the same input
    assert!(ZoneMinutes::new(-10.0, 20.0, 30.0).is_err());
  }

  #[test]
  fn test_assess_breakdown() {
    let minutes = ZoneMinutes::new(240.0, 10.0, 30.0).unwrap();
    let assessment = assess(&minutes);

    assert_eq!(assessment.class, Some(TidClass::Polarized));
    assert_eq!(assessment.zones.len(), 3);
    assert_eq!(assessment.zones[0].zone, Zone::Z1);
    assert_approx_eq!(assessment.zones[0].share, 240.0 / 280.0, 1e-12);
    assert_eq!(assessment.zones[1].effect, "VLaMax suppression");
    assert!(assessment.guidance.unwrap().starts_with("Polarized"));
  }

  #[test]
  fn test_eighty_ten_ten_is_still_pyramidal() {
    // 80/10/10 reads as polarized by eye but scores log10(80) ~ 1.90
    let assessment = assess(&ZoneMinutes::new(240.0, 30.0, 30.0).unwrap());
    assert_approx_eq!(assessment.pi, 80.0_f64.log10(), 1e-9);
    assert_eq!(assessment.class, Some(TidClass::Pyramidal));
  }

  #[test]
  fn test_assess_without_data_has_no_class() {
    let assessment = assess(&ZoneMinutes::ZERO);
    assert_eq!(assessment.pi, 0.0);
    assert!(assessment.class.is_none());
    assert!(assessment.guidance.is_none());
    assert!(assessment.zones.iter().all(|row| row.share == 0.0));
  }

  proptest! {
    #[test]
    fn evaluate_is_scale_invariant(
      z1 in 0.0f64..1000.0,
      z2 in 0.0f64..1000.0,
      z3 in 0.0f64..1000.0,
      c in 0.01f64..100.0,
    ) {
      prop_assume!(z1 + z2 + z3 > 1e-6);
      let base = evaluate(z1, z2, z3);
      let scaled = evaluate(c * z1, c * z2, c * z3);
      prop_assert!((base - scaled).abs() < 1e-9, "{} vs {}", base, scaled);
    }
  }
}
