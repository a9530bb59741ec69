//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories
//! - Helper assertions

use crate::models::{SolveRequest, Strategy, ZoneMinutes};
use crate::settings::SolverSettings;

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A pyramidal week in progress: 120 min Z1, 20 min Z2, 15 min Z3
pub fn mock_done_minutes() -> ZoneMinutes {
  ZoneMinutes {
    z1: 120.0,
    z2: 20.0,
    z3: 15.0,
  }
}

/// A polarized week: high Z1, little Z2
pub fn mock_polarized_minutes() -> ZoneMinutes {
  ZoneMinutes {
    z1: 240.0,
    z2: 10.0,
    z3: 30.0,
  }
}

/// Request against [`mock_done_minutes`]
pub fn mock_request(target_pi: f64, strategy: Strategy) -> SolveRequest {
  SolveRequest {
    done_minutes: mock_done_minutes(),
    target_pi,
    strategy,
  }
}

pub fn mock_settings() -> SolverSettings {
  SolverSettings {
    target_pi: 2.5,
    fixed_ratio: 0.8,
    delta_z3: 30.0,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {{
    let (left, right): (f64, f64) = ($left, $right);
    let diff = (left - right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      left,
      right,
      diff,
      $tolerance
    );
  }};
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    assert!(mock_done_minutes().validate().is_ok());
    assert!(mock_polarized_minutes().validate().is_ok());

    let request = mock_request(2.5, Strategy::MinimizeAddedTime);
    assert_eq!(request.done_minutes, mock_done_minutes());

    let settings = mock_settings();
    assert!(settings.validate().is_ok());
  }

  #[test]
  fn test_assert_approx_eq_accepts_close_values() {
    assert_approx_eq!(1.0, 1.0 + 1e-12, 1e-9);
  }

  #[test]
  #[should_panic(expected = "Values not approximately equal")]
  fn test_assert_approx_eq_rejects_distant_values() {
    assert_approx_eq!(1.0, 1.1, 1e-9);
  }
}
