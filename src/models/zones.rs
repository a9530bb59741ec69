use serde::{Deserialize, Serialize};

use crate::error::PiError;

/// ---------------------------------------------------------------------------
/// Intensity Zones
/// ---------------------------------------------------------------------------

/// Three-zone intensity model used by the Polarization Index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
  Z1, // Low: below first lactate threshold
  Z2, // Threshold: between the two thresholds
  Z3, // High: above second lactate threshold
}

impl Zone {
  pub const ALL: [Zone; 3] = [Zone::Z1, Zone::Z2, Zone::Z3];

  pub fn as_str(&self) -> &'static str {
    match self {
      Zone::Z1 => "Z1",
      Zone::Z2 => "Z2",
      Zone::Z3 => "Z3",
    }
  }

  /// Physiological effect of time spent in the zone
  pub fn effect(&self) -> &'static str {
    match self {
      Zone::Z1 => "Recovery / capillarisation",
      Zone::Z2 => "VLaMax suppression",
      Zone::Z3 => "VO2max stimulus",
    }
  }
}

impl std::fmt::Display for Zone {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Upper bounds of HR zones 1-4 as a percentage of max HR; zone 5 is open
const HR_ZONE_CEILINGS_PCT: [f64; 4] = [60.0, 70.0, 80.0, 90.0];

/// Five-zone heart rate model banded by percentage of max HR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HrZone {
  Z1,
  Z2,
  /// Tempo band, the only one that lands in the threshold zone
  Z3,
  Z4,
  Z5,
}

impl HrZone {
  pub const ALL: [HrZone; 5] = [HrZone::Z1, HrZone::Z2, HrZone::Z3, HrZone::Z4, HrZone::Z5];

  /// Band a heart rate against max HR. None for a non-positive or
  /// non-finite reading or max.
  pub fn from_heart_rate(bpm: f64, max_hr: f64) -> Option<Self> {
    if !bpm.is_finite() || !max_hr.is_finite() || bpm <= 0.0 || max_hr <= 0.0 {
      return None;
    }
    let pct = bpm / max_hr * 100.0;
    let band = HR_ZONE_CEILINGS_PCT
      .iter()
      .position(|&ceiling| pct < ceiling)
      .unwrap_or(HR_ZONE_CEILINGS_PCT.len());
    Some(Self::ALL[band])
  }

  /// Collapse onto the three-zone model
  pub fn intensity_zone(&self) -> Zone {
    match self {
      HrZone::Z1 | HrZone::Z2 => Zone::Z1,
      HrZone::Z3 => Zone::Z2,
      HrZone::Z4 | HrZone::Z5 => Zone::Z3,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Zone Minutes
/// ---------------------------------------------------------------------------

/// Time spent per zone. All components are expected to be >= 0; a zero total
/// is the explicit "no data" state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneMinutes {
  pub z1: f64,
  pub z2: f64,
  pub z3: f64,
}

impl ZoneMinutes {
  pub const ZERO: ZoneMinutes = ZoneMinutes {
    z1: 0.0,
    z2: 0.0,
    z3: 0.0,
  };

  /// Build a validated triple, rejecting negative or non-finite components
  pub fn new(z1: f64, z2: f64, z3: f64) -> Result<Self, PiError> {
    let minutes = Self { z1, z2, z3 };
    minutes.validate()?;
    Ok(minutes)
  }

  pub fn validate(&self) -> Result<(), PiError> {
    for zone in Zone::ALL {
      let value = self.get(zone);
      if !value.is_finite() {
        return Err(PiError::NonFiniteMinutes {
          zone: zone.as_str().to_string(),
        });
      }
      if value < 0.0 {
        return Err(PiError::NegativeMinutes {
          zone: zone.as_str().to_string(),
          value,
        });
      }
    }
    Ok(())
  }

  /// Split a total volume by zone percentages; Z3 takes the remainder
  pub fn from_percentages(total_volume: f64, z1_pct: f64, z2_pct: f64) -> Result<Self, PiError> {
    if !total_volume.is_finite() || total_volume < 0.0 {
      return Err(PiError::InvalidPercentages(format!(
        "total volume must be non-negative, got {}",
        total_volume
      )));
    }
    let in_range = |p: f64| p.is_finite() && (0.0..=100.0).contains(&p);
    if !in_range(z1_pct) || !in_range(z2_pct) {
      return Err(PiError::InvalidPercentages(format!(
        "percentages must be within 0..=100, got Z1={} Z2={}",
        z1_pct, z2_pct
      )));
    }
    if z1_pct + z2_pct > 100.0 {
      return Err(PiError::InvalidPercentages(format!(
        "Z1 + Z2 exceeds 100% ({} + {})",
        z1_pct, z2_pct
      )));
    }

    let z3_pct = 100.0 - z1_pct - z2_pct;
    Self::new(
      total_volume * z1_pct / 100.0,
      total_volume * z2_pct / 100.0,
      total_volume * z3_pct / 100.0,
    )
  }

  /// Aggregate minutes recorded against the five-zone HR model
  pub fn from_hr_zone_minutes(entries: &[(HrZone, f64)]) -> Result<Self, PiError> {
    let mut minutes = Self::ZERO;
    for (hr_zone, dur_min) in entries {
      let zone = hr_zone.intensity_zone();
      minutes = minutes.with(zone, minutes.get(zone) + dur_min);
    }
    minutes.validate()?;
    Ok(minutes)
  }

  /// Time in zone from an evenly sampled HR stream. Dropouts (zero,
  /// negative or non-finite readings) are skipped.
  pub fn from_heart_rate_stream(
    samples_bpm: &[f64],
    max_hr: f64,
    sample_secs: f64,
  ) -> Result<Self, PiError> {
    if !max_hr.is_finite() || max_hr <= 0.0 {
      return Err(PiError::InvalidHeartRate(format!(
        "max HR must be positive, got {}",
        max_hr
      )));
    }
    if !sample_secs.is_finite() || sample_secs <= 0.0 {
      return Err(PiError::InvalidHeartRate(format!(
        "sample interval must be positive, got {}",
        sample_secs
      )));
    }

    let per_sample = sample_secs / 60.0;
    let mut minutes = Self::ZERO;
    for hr_zone in samples_bpm
      .iter()
      .filter_map(|&bpm| HrZone::from_heart_rate(bpm, max_hr))
    {
      let zone = hr_zone.intensity_zone();
      minutes = minutes.with(zone, minutes.get(zone) + per_sample);
    }
    Ok(minutes)
  }

  pub fn total(&self) -> f64 {
    self.z1 + self.z2 + self.z3
  }

  pub fn is_empty(&self) -> bool {
    self.total() == 0.0
  }

  pub fn get(&self, zone: Zone) -> f64 {
    match zone {
      Zone::Z1 => self.z1,
      Zone::Z2 => self.z2,
      Zone::Z3 => self.z3,
    }
  }

  /// Copy with one zone replaced
  pub fn with(&self, zone: Zone, value: f64) -> Self {
    let mut out = *self;
    match zone {
      Zone::Z1 => out.z1 = value,
      Zone::Z2 => out.z2 = value,
      Zone::Z3 => out.z3 = value,
    }
    out
  }

  /// Component-wise `self - base`, floored at zero
  pub fn added_over(&self, base: &ZoneMinutes) -> Self {
    Self {
      z1: (self.z1 - base.z1).max(0.0),
      z2: (self.z2 - base.z2).max(0.0),
      z3: (self.z3 - base.z3).max(0.0),
    }
  }

  /// True when every component is at least the corresponding one in `floor`
  pub fn covers(&self, floor: &ZoneMinutes) -> bool {
    Zone::ALL.iter().all(|&z| self.get(z) >= floor.get(z))
  }

  pub fn fractions(&self) -> Option<ZoneFractions> {
    ZoneFractions::from_minutes(self)
  }
}

/// ---------------------------------------------------------------------------
/// Zone Fractions
/// ---------------------------------------------------------------------------

/// Share of total time per zone (sums to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneFractions {
  pub f1: f64,
  pub f2: f64,
  pub f3: f64,
}

impl ZoneFractions {
  /// None when the total is zero
  pub fn from_minutes(minutes: &ZoneMinutes) -> Option<Self> {
    let total = minutes.total();
    if total == 0.0 {
      return None;
    }
    Some(Self {
      f1: minutes.z1 / total,
      f2: minutes.z2 / total,
      f3: minutes.z3 / total,
    })
  }

  pub fn get(&self, zone: Zone) -> f64 {
    match zone {
      Zone::Z1 => self.f1,
      Zone::Z2 => self.f2,
      Zone::Z3 => self.f3,
    }
  }
}
