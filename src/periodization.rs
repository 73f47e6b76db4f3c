//! Periodization math
//!
//! Splits a plan into base/quality/peak/taper phases, derives the weekly
//! mileage targets on a 4-week meso-cycle, and carries the one difficulty
//! table that scales everything by experience level.
//!
//! Key principles:
//! - Phase weeks always sum exactly to the plan length
//! - Mileage builds geometrically per cycle, never more than the profile cap
//! - Week 4 of each cycle is a recovery week, cut back from the last build

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::{Phase, PhaseKind, RunnerLevel, WeekConfig};

/// ---------------------------------------------------------------------------
/// Plan Duration Constants
/// ---------------------------------------------------------------------------

pub const MIN_PLAN_WEEKS: u32 = 6;
pub const MAX_PLAN_WEEKS: u32 = 40;

/// Peak phase share of the plan, floored at 2 weeks.
const PEAK_SHARE: f64 = 0.22;
/// Quality phase share of the plan, floored at 3 weeks.
const QUALITY_SHARE: f64 = 0.38;

/// First field test happens on week 5, then every 6 weeks.
const FIRST_TEST_WEEK: u32 = 5;
const TEST_WEEK_INTERVAL: u32 = 6;

/// Within-cycle build multipliers for weeks 1-3 of a meso-cycle.
const CYCLE_DRIFT: [f64; 3] = [1.0, 1.025, 1.05];

/// Taper reduction curves, fractions of observed peak mileage, keyed by
/// taper length.
const TAPER_1: [f64; 1] = [0.55];
const TAPER_2: [f64; 2] = [0.65, 0.45];
const TAPER_3: [f64; 3] = [0.75, 0.60, 0.40];

/// ---------------------------------------------------------------------------
/// Race Class
/// ---------------------------------------------------------------------------

/// Distance class used by the step functions on race distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceClass {
  /// Up to (excluding) 10 km.
  Short,
  /// 10 km up to the half.
  Mid,
  /// Half marathon class.
  Half,
  /// Marathon class.
  Marathon,
}

impl RaceClass {
  pub fn from_km(distance_km: f64) -> Self {
    if distance_km >= 40.0 {
      Self::Marathon
    } else if distance_km >= 20.0 {
      Self::Half
    } else if distance_km >= 10.0 {
      Self::Mid
    } else {
      Self::Short
    }
  }

  fn taper_weeks(self) -> u32 {
    match self {
      Self::Marathon => 3,
      Self::Half => 2,
      Self::Mid | Self::Short => 1,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Runner Profile
/// ---------------------------------------------------------------------------

/// Difficulty scaling by experience level. One table drives the progression
/// caps, the session generator and the schedule audit thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerProfile {
  pub level: RunnerLevel,
  /// Max geometric mileage growth per meso-cycle.
  pub build_rate_max: f64,
  /// Recovery-week mileage as a fraction of the preceding build week.
  pub recovery_fraction: f64,
  /// Scales the per-week quality session count.
  pub quality_multiplier: f64,
  /// Scales the target weekly mileage.
  pub mileage_multiplier: f64,
  /// Scales repetition counts in workout templates.
  pub rep_scale: f64,
  /// Minimum hours between two quality sessions before the audit flags it.
  pub min_quality_gap_hours: u32,
  pub max_quality_per_week: u32,
  pub max_consecutive_days: u32,
  pub min_rest_days: u32,
}

impl RunnerProfile {
  pub fn for_level(level: RunnerLevel) -> Self {
    match level {
      RunnerLevel::Beginner => Self {
        level,
        build_rate_max: 1.08,
        recovery_fraction: 0.70,
        quality_multiplier: 0.7,
        mileage_multiplier: 0.85,
        rep_scale: 0.75,
        min_quality_gap_hours: 72,
        max_quality_per_week: 1,
        max_consecutive_days: 3,
        min_rest_days: 2,
      },
      RunnerLevel::Intermediate => Self {
        level,
        build_rate_max: 1.10,
        recovery_fraction: 0.72,
        quality_multiplier: 1.0,
        mileage_multiplier: 1.0,
        rep_scale: 1.0,
        min_quality_gap_hours: 48,
        max_quality_per_week: 2,
        max_consecutive_days: 5,
        min_rest_days: 1,
      },
      RunnerLevel::Advanced => Self {
        level,
        build_rate_max: 1.12,
        recovery_fraction: 0.75,
        quality_multiplier: 1.3,
        mileage_multiplier: 1.15,
        rep_scale: 1.2,
        min_quality_gap_hours: 36,
        max_quality_per_week: 3,
        max_consecutive_days: 6,
        min_rest_days: 1,
      },
    }
  }
}

/// ---------------------------------------------------------------------------
/// Phase Construction
/// ---------------------------------------------------------------------------

/// Split the plan into base/quality/peak/taper.
///
/// Taper length steps on race class, peak and quality take fixed shares of
/// the plan, and base absorbs the remainder. A negative remainder means the
/// plan cannot hold the mandatory phases and is a fatal input error.
pub fn build_phases(total_weeks: u32, race_distance_km: f64) -> Result<Vec<Phase>, PlanError> {
  if !(MIN_PLAN_WEEKS..=MAX_PLAN_WEEKS).contains(&total_weeks) {
    return Err(PlanError::UnsupportedDuration {
      weeks: total_weeks,
      min: MIN_PLAN_WEEKS,
      max: MAX_PLAN_WEEKS,
    });
  }

  let taper = RaceClass::from_km(race_distance_km).taper_weeks();
  let peak = 2.max((f64::from(total_weeks) * PEAK_SHARE).floor() as u32);
  let quality = 3.max((f64::from(total_weeks) * QUALITY_SHARE).floor() as u32);

  let allocated = taper + peak + quality;
  if allocated > total_weeks {
    return Err(PlanError::PlanTooShort {
      weeks: total_weeks,
      race_distance_km,
    });
  }

  Ok(vec![
    Phase {
      kind: PhaseKind::Base,
      week_count: total_weeks - allocated,
    },
    Phase {
      kind: PhaseKind::Quality,
      week_count: quality,
    },
    Phase {
      kind: PhaseKind::Peak,
      week_count: peak,
    },
    Phase {
      kind: PhaseKind::Taper,
      week_count: taper,
    },
  ])
}

/// Phase of a 1-based week number, with its 0-based index inside the phase
/// and the phase length. Callers guarantee `week_number` is in range.
pub fn phase_of_week(phases: &[Phase], week_number: u32) -> (PhaseKind, u32, u32) {
  let mut remaining = week_number.saturating_sub(1);
  for phase in phases {
    if remaining < phase.week_count {
      return (phase.kind, remaining, phase.week_count);
    }
    remaining -= phase.week_count;
  }
  // past the end only happens on a malformed phase list; treat as taper
  (PhaseKind::Taper, 0, 1)
}

/// ---------------------------------------------------------------------------
/// Target Mileage
/// ---------------------------------------------------------------------------

/// Weekly mileage the progression builds toward: a step function of race
/// class and fitness, scaled by the level multiplier.
pub fn target_weekly_km(race_distance_km: f64, vdot: f64, profile: &RunnerProfile) -> f64 {
  let base = match RaceClass::from_km(race_distance_km) {
    RaceClass::Short => step_on_vdot(vdot, 35.0, 45.0, 55.0),
    RaceClass::Mid => step_on_vdot(vdot, 40.0, 50.0, 62.0),
    RaceClass::Half => step_on_vdot(vdot, 45.0, 58.0, 72.0),
    RaceClass::Marathon => step_on_vdot(vdot, 55.0, 70.0, 85.0),
  };
  base * profile.mileage_multiplier
}

fn step_on_vdot(vdot: f64, low: f64, mid: f64, high: f64) -> f64 {
  if vdot < 40.0 {
    low
  } else if vdot < 55.0 {
    mid
  } else {
    high
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Progression
/// ---------------------------------------------------------------------------

/// Produce one `WeekConfig` per plan week.
///
/// Non-taper weeks follow a 4-week meso-cycle: three build weeks on a small
/// escalating drift, with the cycle base advancing geometrically once per
/// cycle (capped at the profile rate), then one recovery week. Field-test
/// weeks are marked non-recovery. Taper weeks step down from observed peak
/// mileage on a curve keyed by taper length.
pub fn build_week_configs(
  total_weeks: u32,
  taper_weeks: u32,
  current_weekly_km: f64,
  target_km: f64,
  profile: &RunnerProfile,
  min_taper_km: f64,
) -> Vec<WeekConfig> {
  let build_weeks = total_weeks.saturating_sub(taper_weeks);
  let mut configs = Vec::with_capacity(total_weeks as usize);

  let mut cycle_base = current_weekly_km.max(1.0);
  let mut last_build_km = cycle_base;

  for week in 1..=build_weeks {
    let cycle_pos = ((week - 1) % 4) as usize;
    let is_test = week >= FIRST_TEST_WEEK && (week - FIRST_TEST_WEEK) % TEST_WEEK_INTERVAL == 0;

    if cycle_pos == 3 {
      // recovery week, cut back from the last build week
      configs.push(WeekConfig {
        target_km: round_km(last_build_km * profile.recovery_fraction),
        is_recovery: !is_test,
        is_test,
      });
      continue;
    }

    if cycle_pos == 0 && week > 1 {
      // geometric step toward the target, once per cycle
      let cycles_left = (build_weeks - week) / 4 + 1;
      let needed = (target_km / cycle_base)
        .max(1.0)
        .powf(1.0 / f64::from(cycles_left));
      cycle_base = (cycle_base * needed.min(profile.build_rate_max)).min(target_km);
    }

    last_build_km = cycle_base * CYCLE_DRIFT[cycle_pos];
    configs.push(WeekConfig {
      target_km: round_km(last_build_km),
      is_recovery: false,
      is_test,
    });
  }

  let peak_km = configs
    .iter()
    .map(|c| c.target_km)
    .fold(current_weekly_km, f64::max);

  let curve: &[f64] = match taper_weeks {
    0 => &[],
    1 => &TAPER_1,
    2 => &TAPER_2,
    _ => &TAPER_3,
  };
  for fraction in curve.iter().take(taper_weeks as usize) {
    configs.push(WeekConfig {
      target_km: round_km((peak_km * fraction).max(min_taper_km)),
      is_recovery: false,
      is_test: false,
    });
  }

  configs
}

fn round_km(km: f64) -> f64 {
  (km * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn phase_weeks(phases: &[Phase], kind: PhaseKind) -> u32 {
    phases
      .iter()
      .find(|p| p.kind == kind)
      .map_or(0, |p| p.week_count)
  }

  #[test]
  fn test_sixteen_week_ten_k_split() {
    let phases = build_phases(16, 10.0).unwrap();
    assert_eq!(phase_weeks(&phases, PhaseKind::Taper), 1);
    assert_eq!(phase_weeks(&phases, PhaseKind::Peak), 3);
    assert_eq!(phase_weeks(&phases, PhaseKind::Quality), 6);
    assert_eq!(phase_weeks(&phases, PhaseKind::Base), 6);
  }

  #[test]
  fn test_phase_weeks_always_sum_to_total() {
    // Property: for every supported duration and distance class
    for total in MIN_PLAN_WEEKS..=MAX_PLAN_WEEKS {
      for distance in [5.0, 10.0, 21.1, 42.2] {
        match build_phases(total, distance) {
          Ok(phases) => {
            let sum: u32 = phases.iter().map(|p| p.week_count).sum();
            assert_eq!(sum, total, "phases must sum to {total} for {distance} km");
          }
          Err(PlanError::PlanTooShort { .. }) => {
            // only the shortest plans for the longest races may refuse
            assert!(total < 8 && distance >= 20.0);
          }
          Err(other) => panic!("unexpected error: {other}"),
        }
      }
    }
  }

  #[test]
  fn test_unsupported_duration_is_fatal() {
    assert!(matches!(
      build_phases(4, 10.0),
      Err(PlanError::UnsupportedDuration { .. })
    ));
    assert!(matches!(
      build_phases(60, 10.0),
      Err(PlanError::UnsupportedDuration { .. })
    ));
  }

  #[test]
  fn test_negative_base_is_too_short() {
    // 6 supported weeks cannot hold a marathon taper plus the mandatory
    // quality and peak blocks
    assert!(matches!(
      build_phases(6, 42.2),
      Err(PlanError::PlanTooShort { .. })
    ));
  }

  #[test]
  fn test_marathon_taper_is_three_weeks() {
    let phases = build_phases(20, 42.2).unwrap();
    assert_eq!(phase_weeks(&phases, PhaseKind::Taper), 3);
    let phases = build_phases(20, 21.1).unwrap();
    assert_eq!(phase_weeks(&phases, PhaseKind::Taper), 2);
  }

  #[test]
  fn test_phase_of_week_walks_boundaries() {
    let phases = build_phases(16, 10.0).unwrap();
    assert_eq!(phase_of_week(&phases, 1).0, PhaseKind::Base);
    assert_eq!(phase_of_week(&phases, 6).0, PhaseKind::Base);
    assert_eq!(phase_of_week(&phases, 7).0, PhaseKind::Quality);
    assert_eq!(phase_of_week(&phases, 12).0, PhaseKind::Quality);
    assert_eq!(phase_of_week(&phases, 13).0, PhaseKind::Peak);
    assert_eq!(phase_of_week(&phases, 16).0, PhaseKind::Taper);
  }

  #[test]
  fn test_build_progression_shape() {
    // currentWeeklyKm=30, target=50, buildRateMax=1.10, 10 build weeks:
    // mileage strictly increases except on each cycle's recovery week,
    // which is strictly below the preceding build week.
    let profile = RunnerProfile {
      build_rate_max: 1.10,
      ..RunnerProfile::for_level(RunnerLevel::Intermediate)
    };
    let configs = build_week_configs(10, 0, 30.0, 50.0, &profile, 15.0);
    assert_eq!(configs.len(), 10);

    let mut last_build = 0.0_f64;
    for (i, config) in configs.iter().enumerate() {
      if config.is_recovery {
        assert!(
          config.target_km < last_build,
          "recovery week {} must cut back from {last_build}",
          i + 1
        );
      } else {
        assert!(
          config.target_km > last_build,
          "build week {} ({}) must exceed the previous build ({last_build})",
          i + 1,
          config.target_km
        );
        last_build = config.target_km;
      }
    }
  }

  #[test]
  fn test_build_rate_cap_respected() {
    let profile = RunnerProfile::for_level(RunnerLevel::Beginner);
    let configs = build_week_configs(12, 0, 20.0, 80.0, &profile, 15.0);

    let mut prev_base = 20.0;
    for chunk in configs.chunks(4) {
      let base = chunk[0].target_km;
      assert!(
        base / prev_base <= profile.build_rate_max + 1e-9,
        "cycle base {base} grew faster than the cap from {prev_base}"
      );
      prev_base = base;
    }
  }

  #[test]
  fn test_test_weeks_marked_non_recovery() {
    let profile = RunnerProfile::for_level(RunnerLevel::Intermediate);
    let configs = build_week_configs(18, 0, 30.0, 55.0, &profile, 15.0);

    // first test on week 5, then every 6 weeks
    for week in [5usize, 11, 17] {
      let config = &configs[week - 1];
      assert!(config.is_test, "week {week} should be a test week");
      assert!(!config.is_recovery);
    }
    assert!(!configs[0].is_test);
    assert!(!configs[5].is_test);
  }

  #[test]
  fn test_taper_steps_down_from_peak() {
    let profile = RunnerProfile::for_level(RunnerLevel::Intermediate);
    let configs = build_week_configs(16, 3, 40.0, 70.0, &profile, 15.0);
    assert_eq!(configs.len(), 16);

    let peak = configs[..13]
      .iter()
      .map(|c| c.target_km)
      .fold(0.0_f64, f64::max);
    let taper: Vec<f64> = configs[13..].iter().map(|c| c.target_km).collect();

    assert!((taper[0] - round(peak * 0.75)).abs() < 0.11);
    assert!(taper[0] > taper[1] && taper[1] > taper[2]);
    assert!(taper.iter().all(|km| *km >= 15.0));

    fn round(km: f64) -> f64 {
      (km * 10.0).round() / 10.0
    }
  }

  #[test]
  fn test_taper_floor_applies() {
    let profile = RunnerProfile::for_level(RunnerLevel::Beginner);
    // tiny mileage: taper fractions would fall under the floor
    let configs = build_week_configs(10, 2, 18.0, 25.0, &profile, 15.0);
    for config in &configs[8..] {
      assert!(config.target_km >= 15.0);
    }
  }

  #[test]
  fn test_target_mileage_steps_and_level_scaling() {
    let beginner = RunnerProfile::for_level(RunnerLevel::Beginner);
    let advanced = RunnerProfile::for_level(RunnerLevel::Advanced);

    assert_eq!(target_weekly_km(42.2, 50.0, &beginner), 70.0 * 0.85);
    assert_eq!(target_weekly_km(42.2, 50.0, &advanced), 70.0 * 1.15);
    assert!(target_weekly_km(10.0, 35.0, &beginner) < target_weekly_km(10.0, 60.0, &beginner));
  }
}
