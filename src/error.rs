use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Caller-side parameter errors. Infeasible targets are not errors; they come
/// back as a `SolveResult` with `feasible = false`.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PiError {
  #[error("Negative minutes for {zone}: {value}")]
  NegativeMinutes { zone: String, value: f64 },

  #[error("Non-finite minutes for {zone}")]
  NonFiniteMinutes { zone: String },

  #[error("Target PI must be a finite number, got {0}")]
  InvalidTarget(f64),

  #[error("Fixed Z1 ratio must be in (0, 1), got {0}")]
  InvalidRatio(f64),

  #[error("Z3 delta must be a finite non-negative number, got {0}")]
  InvalidDelta(f64),

  #[error("Invalid zone percentages: {0}")]
  InvalidPercentages(String),

  #[error("Invalid heart rate input: {0}")]
  InvalidHeartRate(String),

  #[error("Invalid configuration: {0}")]
  Config(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_serializes_with_type_tag() {
    let err = PiError::InvalidRatio(1.5);
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "InvalidRatio");
    assert_eq!(json["message"], 1.5);
  }

  #[test]
  fn test_error_messages_name_the_zone() {
    let err = PiError::NegativeMinutes {
      zone: "Z2".to_string(),
      value: -3.0,
    };
    assert_eq!(err.to_string(), "Negative minutes for Z2: -3");
  }
}
