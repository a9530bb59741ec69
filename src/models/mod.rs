pub mod solve;
pub mod zones;

pub use solve::{Rationale, SolveRequest, SolveResult, Strategy, DEFAULT_FIXED_RATIO};
pub use zones::{HrZone, Zone, ZoneFractions, ZoneMinutes};
