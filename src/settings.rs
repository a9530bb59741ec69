//! Solver defaults
//!
//! Read from the environment (a `.env` file is loaded by the binary). The
//! polarized threshold and the Z2 floor are model constants and are not
//! configurable here.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::PiError;
use crate::models::{Strategy, DEFAULT_FIXED_RATIO};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const ENV_TARGET_PI: &str = "PI_TARGET";
const ENV_FIXED_RATIO: &str = "PI_FIXED_RATIO";
const ENV_DELTA_Z3: &str = "PI_DELTA_Z3";

const DEFAULT_TARGET_PI: f64 = 2.0;
const DEFAULT_DELTA_Z3: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
  /// Target PI used when the caller does not give one
  pub target_pi: f64,
  /// Z1 share for the fixed-ratio strategy
  pub fixed_ratio: f64,
  /// Z3 minutes to add for the fixed-delta strategy
  pub delta_z3: f64,
}

impl Default for SolverSettings {
  fn default() -> Self {
    Self {
      target_pi: DEFAULT_TARGET_PI,
      fixed_ratio: DEFAULT_FIXED_RATIO,
      delta_z3: DEFAULT_DELTA_Z3,
    }
  }
}

impl SolverSettings {
  /// Defaults overridden by `PI_TARGET`, `PI_FIXED_RATIO` and `PI_DELTA_Z3`
  pub fn from_env() -> Result<Self, PiError> {
    let defaults = Self::default();
    let settings = Self {
      target_pi: env_f64(ENV_TARGET_PI)?.unwrap_or(defaults.target_pi),
      fixed_ratio: env_f64(ENV_FIXED_RATIO)?.unwrap_or(defaults.fixed_ratio),
      delta_z3: env_f64(ENV_DELTA_Z3)?.unwrap_or(defaults.delta_z3),
    };
    settings.validate()?;
    Ok(settings)
  }

  pub fn validate(&self) -> Result<(), PiError> {
    if !self.target_pi.is_finite() {
      return Err(PiError::Config(format!(
        "{} must be finite, got {}",
        ENV_TARGET_PI, self.target_pi
      )));
    }
    if !(self.fixed_ratio > 0.0 && self.fixed_ratio < 1.0) {
      return Err(PiError::Config(format!(
        "{} must be in (0, 1), got {}",
        ENV_FIXED_RATIO, self.fixed_ratio
      )));
    }
    if !self.delta_z3.is_finite() || self.delta_z3 < 0.0 {
      return Err(PiError::Config(format!(
        "{} must be non-negative, got {}",
        ENV_DELTA_Z3, self.delta_z3
      )));
    }
    Ok(())
  }

  pub fn fixed_ratio_strategy(&self) -> Strategy {
    Strategy::FixedRatio {
      ratio: self.fixed_ratio,
    }
  }

  pub fn fixed_delta_strategy(&self) -> Strategy {
    Strategy::FixedDeltaZ3 {
      delta: self.delta_z3,
    }
  }
}

/// Unset variables are `None`; set but unparsable ones are an error
fn env_f64(name: &str) -> Result<Option<f64>, PiError> {
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse::<f64>()
      .map(Some)
      .map_err(|e| PiError::Config(format!("{}={:?}: {}", name, raw, e))),
    Err(_) => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_from_env_uses_defaults_when_unset() {
    temp_env::with_vars_unset([ENV_TARGET_PI, ENV_FIXED_RATIO, ENV_DELTA_Z3], || {
      let settings = SolverSettings::from_env().unwrap();
      assert_eq!(settings, SolverSettings::default());
      assert_eq!(settings.fixed_ratio, 0.8);
    });
  }

  #[test]
  #[serial]
  fn test_from_env_reads_overrides() {
    temp_env::with_vars(
      [
        (ENV_TARGET_PI, Some("2.5")),
        (ENV_FIXED_RATIO, Some(" 0.75 ")),
        (ENV_DELTA_Z3, Some("30")),
      ],
      || {
        let settings = SolverSettings::from_env().unwrap();
        assert_eq!(settings.target_pi, 2.5);
        assert_eq!(settings.fixed_ratio, 0.75);
        assert_eq!(settings.delta_z3, 30.0);
        assert_eq!(
          settings.fixed_delta_strategy(),
          Strategy::FixedDeltaZ3 { delta: 30.0 }
        );
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_garbage() {
    temp_env::with_vars(
      [(ENV_TARGET_PI, Some("high")), (ENV_FIXED_RATIO, None), (ENV_DELTA_Z3, None)],
      || {
        let err = SolverSettings::from_env().unwrap_err();
        assert!(matches!(err, PiError::Config(ref msg) if msg.starts_with("PI_TARGET")));
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_out_of_range_ratio() {
    temp_env::with_vars(
      [(ENV_TARGET_PI, None), (ENV_FIXED_RATIO, Some("1.2")), (ENV_DELTA_Z3, None)],
      || {
        assert!(matches!(SolverSettings::from_env(), Err(PiError::Config(_))));
      },
    );
  }

  #[test]
  fn test_validate_rejects_negative_delta() {
    let settings = SolverSettings {
      delta_z3: -10.0,
      ..SolverSettings::default()
    };
    assert!(settings.validate().is_err());
  }
}
