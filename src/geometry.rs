//! Feasible region in (f1, f3) space
//!
//! Pure helpers a renderer can use to draw the PI isoclines and the physical
//! bounds of a three-zone split. f2 is implied as 1 - f1 - f3.

use serde::{Deserialize, Serialize};

use crate::inverse::target_ratio;

/// f3 on the isocline of `target_pi`: K(1 - f1) / (f1 + K)
pub fn isocline_f3(f1: f64, target_pi: f64) -> f64 {
  let k = target_ratio(target_pi);
  k * (1.0 - f1) / (f1 + k)
}

/// PI = 2.0 isocline, where K = 1: (1 - f1) / (1 + f1)
pub fn polarized_boundary(f1: f64) -> f64 {
  (1.0 - f1) / (1.0 + f1)
}

/// Shares cannot exceed the whole: f3 <= 1 - f1
pub fn total_bound(f1: f64) -> f64 {
  1.0 - f1
}

/// Low-intensity work dominates high-intensity work: f3 <= f1
pub fn symmetry_bound(f1: f64) -> f64 {
  f1
}

/// Inside both physical bounds
pub fn is_physical(f1: f64, f3: f64) -> bool {
  (0.0..=1.0).contains(&f1) && f3 >= 0.0 && f3 <= total_bound(f1) && f3 <= symmetry_bound(f1)
}

/// One sampled column of the region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPoint {
  pub f1: f64,
  /// Isocline of the requested target
  pub isocline_f3: f64,
  pub polarized_boundary_f3: f64,
  pub total_bound_f3: f64,
  pub symmetry_bound_f3: f64,
}

/// `samples` evenly spaced points over f1 in [0, 1], endpoints included.
/// Zero samples is an empty region; a single sample sits at f1 = 0.
pub fn sample_region(target_pi: f64, samples: usize) -> Vec<RegionPoint> {
  (0..samples)
    .map(|i| {
      let f1 = if samples == 1 {
        0.0
      } else {
        i as f64 / (samples - 1) as f64
      };
      RegionPoint {
        f1,
        isocline_f3: isocline_f3(f1, target_pi),
        polarized_boundary_f3: polarized_boundary(f1),
        total_bound_f3: total_bound(f1),
        symmetry_bound_f3: symmetry_bound(f1),
      }
    })
    .collect()
}
