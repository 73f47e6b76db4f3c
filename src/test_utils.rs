//! Test utilities and fixture factories
//!
//! Shared builders for unit tests: a canonical plan request, bare sessions
//! and pre-placed weeks. Keep values here stable; several tests assert on
//! the sample request's exact shape.

use chrono::NaiveDate;

use crate::models::{
  PerformanceInput, PhaseKind, PlanRequest, RunnerLevel, Session, SessionKind, Week, Weekday,
};

/// ---------------------------------------------------------------------------
/// Request Fixtures
/// ---------------------------------------------------------------------------

/// Canonical request: 16 weeks to a 10 km race, intermediate runner,
/// training Tue/Thu/Sat/Sun with the long run on Sunday, 30 km/week today,
/// fitness measured by a ~41:20 10 km (VDOT ~50).
pub fn sample_request() -> PlanRequest {
  PlanRequest {
    start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    race_date: NaiveDate::from_ymd_opt(2026, 6, 21).unwrap(),
    race_distance_km: 10.0,
    runner_level: RunnerLevel::Intermediate,
    training_days: [Weekday::Tue, Weekday::Thu, Weekday::Sat, Weekday::Sun]
      .into_iter()
      .collect(),
    long_run_day: Weekday::Sun,
    current_weekly_km: 30.0,
    performance: PerformanceInput::RaceResult {
      distance_km: 10.0,
      time_seconds: 2480.0,
    },
  }
}

/// ---------------------------------------------------------------------------
/// Session Fixtures
/// ---------------------------------------------------------------------------

/// Bare unplaced session of the given kind, intensity and distance.
pub fn session(kind: SessionKind, intensity: u8, distance_km: f64) -> Session {
  Session {
    kind,
    label: format!("{kind:?}"),
    intensity,
    structure: None,
    segments: Vec::new(),
    distance_km,
    day: None,
    is_test: false,
    full_date: None,
  }
}

/// Unplaced field test.
pub fn test_session() -> Session {
  let mut s = session(SessionKind::FieldTest, 4, 7.0);
  s.is_test = true;
  s
}

/// Session already assigned to a day of the sample request's first week.
pub fn placed_session(
  kind: SessionKind,
  intensity: u8,
  day: Weekday,
  distance_km: f64,
) -> Session {
  let mut s = session(kind, intensity, distance_km);
  s.day = Some(day);
  s.full_date = Some(day.date_in_week(sample_request().start_date));
  s
}

pub fn easy_session(distance_km: f64) -> Session {
  session(SessionKind::Easy, 1, distance_km)
}

/// ---------------------------------------------------------------------------
/// Week Fixtures
/// ---------------------------------------------------------------------------

/// Week 1 of the sample plan holding the given placed sessions.
pub fn week_of(mut sessions: Vec<Session>) -> Week {
  sessions.sort_by_key(|s| s.day.map_or(u8::MAX, Weekday::index));
  let total_km = sessions.iter().map(|s| s.distance_km).sum();
  Week {
    week_number: 1,
    phase: PhaseKind::Base,
    start_date: sample_request().start_date,
    total_km,
    sessions,
    tss: 0.0,
  }
}

/// Fully placed sample week: quality Tuesday, easy Thursday, long run
/// Sunday.
pub fn placed_week() -> Week {
  week_of(vec![
    placed_session(SessionKind::Threshold, 3, Weekday::Tue, 10.0),
    placed_session(SessionKind::Easy, 1, Weekday::Thu, 8.0),
    placed_session(SessionKind::LongRun, 2, Weekday::Sun, 14.0),
  ])
}
