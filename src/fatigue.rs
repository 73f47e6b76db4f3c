//! Day-by-day fatigue simulation
//!
//! A pure function of the current placement: every time the placed-session
//! set changes, the whole week is resimulated from Monday. Nothing here is
//! persisted or incrementally updated.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::PlanConfig;
use crate::models::{Session, Weekday};

/// ---------------------------------------------------------------------------
/// Simulation Constants
/// ---------------------------------------------------------------------------

/// Fatigue points added by a session of intensity 1 through 4.
const INTENSITY_POINTS: [f64; 4] = [10.0, 15.0, 35.0, 50.0];

/// Extra load fraction when training on an already-tired body.
const TIRED_AMPLIFICATION: f64 = 0.20;

/// Recovery credit for a day outside the runner's training days.
const OFF_DAY_RECOVERY: f64 = 12.0;

/// Smaller credit for an available day left unused.
const UNUSED_DAY_RECOVERY: f64 = 8.0;

/// Baseline decay applied to every day, trained or not.
const DAILY_DECAY: f64 = 3.0;

/// Fresh/exhausted cutoffs; the tired cutoff comes from `PlanConfig`.
const FRESH_BELOW: f64 = 25.0;
const EXHAUSTED_FROM: f64 = 85.0;

/// ---------------------------------------------------------------------------
/// Fatigue State
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueLevel {
  Fresh,
  Moderate,
  Tired,
  Exhausted,
}

/// Simulated cumulative fatigue per weekday, always non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueState {
  scores: [f64; 7],
}

impl FatigueState {
  /// Simulate the week for the given (possibly partial) placement.
  ///
  /// Days holding a session add their intensity points, amplified 20% when
  /// the running total is already past the tired threshold. Empty days
  /// recover: more if the day is not a training day at all, less if it is
  /// an available day left unused. Every day also decays by a small floor.
  pub fn simulate(
    sessions: &[Session],
    training_days: &BTreeSet<Weekday>,
    config: &PlanConfig,
  ) -> Self {
    let mut scores = [0.0_f64; 7];
    let mut cumulative = 0.0_f64;

    for day in Weekday::ALL {
      let session = sessions.iter().find(|s| s.day == Some(day));
      match session {
        Some(session) => {
          let idx = (session.intensity.clamp(1, 4) - 1) as usize;
          let mut points = INTENSITY_POINTS[idx];
          if cumulative > config.tired_threshold {
            points *= 1.0 + TIRED_AMPLIFICATION;
          }
          cumulative += points;
        }
        None => {
          let recovery = if training_days.contains(&day) {
            UNUSED_DAY_RECOVERY
          } else {
            OFF_DAY_RECOVERY
          };
          cumulative -= recovery;
        }
      }
      cumulative = (cumulative - DAILY_DECAY).max(0.0);
      scores[day.index() as usize] = cumulative;
    }

    Self { scores }
  }

  pub fn score(&self, day: Weekday) -> f64 {
    self.scores[day.index() as usize]
  }

  pub fn level(&self, day: Weekday, config: &PlanConfig) -> FatigueLevel {
    let score = self.score(day);
    if score >= EXHAUSTED_FROM {
      FatigueLevel::Exhausted
    } else if score >= config.tired_threshold {
      FatigueLevel::Tired
    } else if score < FRESH_BELOW {
      FatigueLevel::Fresh
    } else {
      FatigueLevel::Moderate
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{placed_session, sample_request};

  fn training_days() -> BTreeSet<Weekday> {
    sample_request().training_days
  }

  #[test]
  fn test_empty_week_stays_at_zero() {
    let state = FatigueState::simulate(&[], &training_days(), &PlanConfig::default());
    for day in Weekday::ALL {
      assert_eq!(state.score(day), 0.0);
    }
  }

  #[test]
  fn test_session_adds_intensity_points() {
    let config = PlanConfig::default();
    let sessions = vec![placed_session(crate::models::SessionKind::Vma, 4, Weekday::Tue, 10.0)];
    let state = FatigueState::simulate(&sessions, &training_days(), &config);

    // Monday recovers to zero, Tuesday adds 50 then decays 3
    assert_eq!(state.score(Weekday::Mon), 0.0);
    assert_eq!(state.score(Weekday::Tue), 47.0);
    assert!(state.score(Weekday::Wed) < 47.0);
  }

  #[test]
  fn test_tired_amplification_kicks_in() {
    let config = PlanConfig::default();
    // back-to-back hard days push the second one past the tired threshold
    let sessions = vec![
      placed_session(crate::models::SessionKind::Vma, 4, Weekday::Mon, 10.0),
      placed_session(crate::models::SessionKind::Vma, 4, Weekday::Tue, 10.0),
      placed_session(crate::models::SessionKind::Vma, 4, Weekday::Wed, 10.0),
    ];
    let state = FatigueState::simulate(&sessions, &training_days(), &config);

    // Mon 47, Tue 94; Wed adds 50 * 1.2 = 60 before the daily decay
    assert_eq!(state.score(Weekday::Mon), 47.0);
    assert_eq!(state.score(Weekday::Tue), 94.0);
    assert_eq!(state.score(Weekday::Wed), 151.0);
  }

  #[test]
  fn test_off_days_recover_more_than_unused_days() {
    let config = PlanConfig::default();
    let sessions = vec![placed_session(crate::models::SessionKind::Vma, 4, Weekday::Mon, 10.0)];

    // Tuesday is a training day in the sample request, Wednesday is not
    let days = training_days();
    assert!(days.contains(&Weekday::Tue) && !days.contains(&Weekday::Wed));

    let state = FatigueState::simulate(&sessions, &days, &config);
    let tue_drop = state.score(Weekday::Mon) - state.score(Weekday::Tue);
    let wed_drop = state.score(Weekday::Tue) - state.score(Weekday::Wed);
    assert_eq!(tue_drop, UNUSED_DAY_RECOVERY + DAILY_DECAY);
    assert_eq!(wed_drop, OFF_DAY_RECOVERY + DAILY_DECAY);
  }

  #[test]
  fn test_scores_never_negative() {
    let state = FatigueState::simulate(&[], &BTreeSet::new(), &PlanConfig::default());
    for day in Weekday::ALL {
      assert!(state.score(day) >= 0.0);
    }
  }

  #[test]
  fn test_levels_follow_thresholds() {
    let config = PlanConfig::default();
    let sessions = vec![
      placed_session(crate::models::SessionKind::Vma, 4, Weekday::Mon, 10.0),
      placed_session(crate::models::SessionKind::Vma, 4, Weekday::Tue, 10.0),
    ];
    let state = FatigueState::simulate(&sessions, &training_days(), &config);

    assert_eq!(state.level(Weekday::Mon, &config), FatigueLevel::Moderate);
    assert_eq!(state.level(Weekday::Tue, &config), FatigueLevel::Exhausted);

    // a single moderate session fades back to fresh within a few days
    let light = vec![placed_session(
      crate::models::SessionKind::Easy,
      1,
      Weekday::Mon,
      8.0,
    )];
    let state = FatigueState::simulate(&light, &training_days(), &config);
    assert_eq!(state.level(Weekday::Wed, &config), FatigueLevel::Fresh);
  }
}
