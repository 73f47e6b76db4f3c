//! Generation configuration
//!
//! One immutable value threaded through every call. There is no ambient
//! global state in the core: callers build a `PlanConfig` once (usually
//! `PlanConfig::default()`) and pass it by reference.

use serde::{Deserialize, Serialize};

use crate::models::Weekday;

/// Tunable knobs for plan generation.
///
/// Physiological constants (zone percentages, the velocity/VO2 relation,
/// fatigue point values) are fixed in their modules; this struct carries the
/// few values that legitimately vary between deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
  /// Distance credited per between-rep recovery when no pace is computable.
  /// A single default for all experience levels.
  pub recovery_fallback_km: f64,

  /// Absolute floor for taper-week mileage.
  pub min_taper_km: f64,

  /// Cumulative fatigue above which a day counts as "tired" for both the
  /// simulation amplification and the placement scorer.
  pub tired_threshold: f64,

  /// Preferred days for VO2max interval sessions (early week).
  pub vma_preferred_days: Vec<Weekday>,

  /// Preferred days for threshold sessions (midweek).
  pub threshold_preferred_days: Vec<Weekday>,
}

impl Default for PlanConfig {
  fn default() -> Self {
    Self {
      recovery_fallback_km: 0.25,
      min_taper_km: 15.0,
      tired_threshold: 55.0,
      vma_preferred_days: vec![Weekday::Tue, Weekday::Wed],
      threshold_preferred_days: vec![Weekday::Wed, Weekday::Thu],
    }
  }
}
