//! Plan-level error types
//!
//! Fatal conditions only. Recoverable degradations (out-of-range fitness
//! index, degenerate workout descriptors) never become errors: they fall
//! back to documented defaults and are reported through the plan warnings.

use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
  #[error("plan duration of {weeks} weeks is outside the supported range ({min}-{max})")]
  UnsupportedDuration { weeks: u32, min: u32, max: u32 },

  #[error("a {weeks}-week plan is too short for a {race_distance_km} km race")]
  PlanTooShort { weeks: u32, race_distance_km: f64 },

  #[error("invalid plan request: {0}")]
  InvalidRequest(String),

  #[error("no available day left for \"{label}\" in week {week_number}")]
  UnplaceableSession { week_number: u32, label: String },
}

impl Serialize for PlanError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
