//! Plan request and runner profile inputs
//!
//! The request is assumed pre-validated by the form layer, but the core
//! still checks its own domain rules before generating anything.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::Weekday;

/// ---------------------------------------------------------------------------
/// Runner Level
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerLevel {
  Beginner,
  Intermediate,
  Advanced,
}

impl std::fmt::Display for RunnerLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Beginner => write!(f, "beginner"),
      Self::Intermediate => write!(f, "intermediate"),
      Self::Advanced => write!(f, "advanced"),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Performance Input
/// ---------------------------------------------------------------------------

/// How the runner's current fitness was measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerformanceInput {
  /// A recent race or time-trial result.
  RaceResult { distance_km: f64, time_seconds: f64 },
  /// Distance covered in a 6-minute maximal-effort field test.
  FixedDurationTest { distance_km: f64 },
}

/// ---------------------------------------------------------------------------
/// Plan Request
/// ---------------------------------------------------------------------------

/// Everything the core needs to generate a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
  pub start_date: NaiveDate,
  pub race_date: NaiveDate,
  pub race_distance_km: f64,
  pub runner_level: RunnerLevel,
  /// Days the runner can train. Cardinality must be at least 3.
  pub training_days: BTreeSet<Weekday>,
  /// Must be one of `training_days`.
  pub long_run_day: Weekday,
  pub current_weekly_km: f64,
  pub performance: PerformanceInput,
}

impl PlanRequest {
  /// Domain validation. The form layer catches most of this earlier, but
  /// the core never trusts that it ran.
  pub fn validate(&self) -> Result<(), PlanError> {
    if self.race_date <= self.start_date {
      return Err(PlanError::InvalidRequest(
        "race date must be after the start date".into(),
      ));
    }
    if self.race_distance_km <= 0.0 {
      return Err(PlanError::InvalidRequest(
        "race distance must be positive".into(),
      ));
    }
    if self.training_days.len() < 3 {
      return Err(PlanError::InvalidRequest(format!(
        "need at least 3 training days, got {}",
        self.training_days.len()
      )));
    }
    if !self.training_days.contains(&self.long_run_day) {
      return Err(PlanError::InvalidRequest(format!(
        "long run day {} is not a training day",
        self.long_run_day
      )));
    }
    if self.current_weekly_km <= 0.0 {
      return Err(PlanError::InvalidRequest(
        "current weekly mileage must be positive".into(),
      ));
    }
    Ok(())
  }

  /// Monday of the week containing the start date. Week 1 of the plan.
  pub fn first_week_start(&self) -> NaiveDate {
    use chrono::Datelike;
    self.start_date
      - chrono::Duration::days(i64::from(self.start_date.weekday().num_days_from_monday()))
  }

  /// Number of plan weeks, race week included.
  pub fn total_weeks(&self) -> u32 {
    let days = (self.race_date - self.first_week_start()).num_days().max(0);
    (days / 7) as u32 + 1
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::sample_request;

  #[test]
  fn test_valid_request_passes() {
    assert!(sample_request().validate().is_ok());
  }

  #[test]
  fn test_too_few_training_days() {
    let mut req = sample_request();
    req.training_days = [Weekday::Tue, Weekday::Sat].into_iter().collect();
    let err = req.validate().unwrap_err();
    assert!(err.to_string().contains("at least 3 training days"));
  }

  #[test]
  fn test_long_run_day_must_be_available() {
    let mut req = sample_request();
    req.training_days.remove(&req.long_run_day);
    req.training_days.insert(Weekday::Mon);
    assert!(req.validate().is_err());
  }

  #[test]
  fn test_total_weeks_counts_race_week() {
    let req = sample_request();
    // sample: starts Monday 2026-03-02, race Sunday 2026-06-21 -> 16 weeks
    assert_eq!(req.total_weeks(), 16);
  }

  #[test]
  fn test_first_week_start_aligns_to_monday() {
    let mut req = sample_request();
    // Wednesday start still anchors week 1 on the preceding Monday
    req.start_date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
    assert_eq!(
      req.first_week_start(),
      NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    );
  }
}
