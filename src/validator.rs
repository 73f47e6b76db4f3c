//! Schedule audit
//!
//! Post-hoc advisory layer. Re-derives rule findings from a finished week's
//! day-by-day session layout and scores it 0-100. Never mutates the plan
//! and never blocks generation; callers decide what to do with the report.

use serde::{Deserialize, Serialize};

use crate::models::{PlanRequest, Session, TrainingPlan, Week, Weekday};
use crate::periodization::RunnerProfile;

/// ---------------------------------------------------------------------------
/// Scoring Constants
/// ---------------------------------------------------------------------------

const ERROR_COST: i32 = 25;
const WARNING_COST: i32 = 10;
const RECOMMENDATION_COST: i32 = 3;
const CLEAN_BONUS: i32 = 10;

/// Ideal quality days for the placement-optimality heuristics.
const IDEAL_QUALITY_DAYS: [Weekday; 3] = [Weekday::Tue, Weekday::Wed, Weekday::Thu];

/// ---------------------------------------------------------------------------
/// Report Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFinding {
  pub rule: String,
  pub message: String,
}

impl RuleFinding {
  fn new(rule: &str, message: String) -> Self {
    Self {
      rule: rule.to_string(),
      message,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
  pub week_number: u32,
  pub errors: Vec<RuleFinding>,
  pub warnings: Vec<RuleFinding>,
  pub recommendations: Vec<RuleFinding>,
  /// 0-100, higher is better.
  pub score: u8,
}

/// ---------------------------------------------------------------------------
/// Week Audit
/// ---------------------------------------------------------------------------

/// Audit one finished week against the expert rules for the runner's level.
/// Pure: auditing the same week twice yields the identical report.
pub fn audit_week(week: &Week, request: &PlanRequest, profile: &RunnerProfile) -> ScheduleReport {
  let mut errors = Vec::new();
  let mut warnings = Vec::new();
  let mut recommendations = Vec::new();

  let sessions = &week.sessions;
  let hard_days = days_of(sessions, |s| s.is_hard());
  let quality_days = days_of(sessions, |s| s.intensity >= 3 && !s.is_test);
  let session_days = days_of(sessions, |_| true);
  let long_run_day = sessions
    .iter()
    .find(|s| s.kind.is_long_run())
    .and_then(|s| s.day);

  // -- blocking errors -------------------------------------------------

  for pair in hard_days.windows(2) {
    let gap_hours = i32::from(pair[1] - pair[0]) * 24;
    if gap_hours < profile.min_quality_gap_hours as i32 {
      errors.push(RuleFinding::new(
        "quality_spacing",
        format!(
          "{gap_hours}h between hard sessions, a {} runner needs {}h",
          profile.level, profile.min_quality_gap_hours
        ),
      ));
    }
  }

  if let Some(long_day) = long_run_day {
    let next = long_day.index() + 1;
    if sessions
      .iter()
      .any(|s| s.day.map(Weekday::index) == Some(next) && s.intensity >= 3)
    {
      errors.push(RuleFinding::new(
        "rest_after_long_run",
        "hard session the day after the long run".to_string(),
      ));
    }
  }

  let streak = longest_streak(&session_days);
  if streak > profile.max_consecutive_days {
    errors.push(RuleFinding::new(
      "consecutive_days",
      format!(
        "{streak} consecutive training days, max {} for a {} runner",
        profile.max_consecutive_days, profile.level
      ),
    ));
  }

  let rest_days = 7 - session_days.len() as u32;
  if rest_days < profile.min_rest_days {
    errors.push(RuleFinding::new(
      "rest_days",
      format!(
        "only {rest_days} rest days, a {} runner needs {}",
        profile.level, profile.min_rest_days
      ),
    ));
  }

  if quality_days.len() as u32 > profile.max_quality_per_week {
    errors.push(RuleFinding::new(
      "quality_count",
      format!(
        "{} quality sessions, max {} for a {} runner",
        quality_days.len(),
        profile.max_quality_per_week,
        profile.level
      ),
    ));
  }

  // -- warnings ---------------------------------------------------------

  let quality_monday = quality_days.first() == Some(&0);
  if quality_monday && long_run_day == Some(Weekday::Sun) {
    warnings.push(RuleFinding::new(
      "monday_after_sunday_long",
      "quality on Monday with the long run landing on Sunday".to_string(),
    ));
  }

  if let Some(long_day) = long_run_day {
    if let Some(previous) = long_day.index().checked_sub(1) {
      if quality_days.contains(&previous) {
        warnings.push(RuleFinding::new(
          "long_run_after_quality",
          "long run immediately after a quality session".to_string(),
        ));
      }
    }
  }

  for day in 1..6u8 {
    let empty = !session_days.contains(&day);
    if empty && hard_days.contains(&(day - 1)) && hard_days.contains(&(day + 1)) {
      warnings.push(RuleFinding::new(
        "sandwiched_rest",
        format!(
          "single rest day on {} squeezed between two hard days",
          Weekday::from_index(day).map_or("?", Weekday::name)
        ),
      ));
    }
  }

  // -- recommendations ----------------------------------------------------

  for day in &quality_days {
    let weekday = Weekday::from_index(*day);
    if weekday.is_some_and(|d| !IDEAL_QUALITY_DAYS.contains(&d)) {
      recommendations.push(RuleFinding::new(
        "quality_day_choice",
        format!(
          "quality work on {} sits outside the ideal Tuesday-Thursday window",
          weekday.map_or("?", Weekday::name)
        ),
      ));
    }
  }

  if let Some(long_day) = long_run_day {
    if long_day != request.long_run_day {
      recommendations.push(RuleFinding::new(
        "long_run_day_choice",
        format!(
          "long run on {long_day} instead of the preferred {}",
          request.long_run_day
        ),
      ));
    }
  }

  let biggest = sessions
    .iter()
    .map(|s| s.distance_km)
    .fold(0.0_f64, f64::max);
  if week.total_km > 0.0 && biggest > week.total_km * 0.5 {
    recommendations.push(RuleFinding::new(
      "load_balance",
      format!(
        "one session carries {:.0}% of the week",
        biggest / week.total_km * 100.0
      ),
    ));
  }

  if rest_days > profile.min_rest_days + 2 {
    recommendations.push(RuleFinding::new(
      "unused_capacity",
      format!("{rest_days} full rest days this week"),
    ));
  }

  let score = compute_score(&errors, &warnings, &recommendations);
  ScheduleReport {
    week_number: week.week_number,
    errors,
    warnings,
    recommendations,
    score,
  }
}

/// Advisory report for every week of a plan.
pub fn validate_plan(plan: &TrainingPlan) -> Vec<ScheduleReport> {
  let profile = RunnerProfile::for_level(plan.request.runner_level);
  plan
    .weeks
    .iter()
    .map(|week| audit_week(week, &plan.request, &profile))
    .collect()
}

/// ---------------------------------------------------------------------------
/// Helpers
/// ---------------------------------------------------------------------------

fn days_of(sessions: &[Session], keep: impl Fn(&Session) -> bool) -> Vec<u8> {
  let mut days: Vec<u8> = sessions
    .iter()
    .filter(|s| keep(s))
    .filter_map(|s| s.day.map(Weekday::index))
    .collect();
  days.sort_unstable();
  days
}

fn longest_streak(sorted_days: &[u8]) -> u32 {
  let mut longest = 0u32;
  let mut current = 0u32;
  let mut previous: Option<u8> = None;
  for &day in sorted_days {
    current = match previous {
      Some(p) if day == p + 1 => current + 1,
      _ => 1,
    };
    longest = longest.max(current);
    previous = Some(day);
  }
  longest
}

fn compute_score(
  errors: &[RuleFinding],
  warnings: &[RuleFinding],
  recommendations: &[RuleFinding],
) -> u8 {
  let mut score = 100i32;
  score -= ERROR_COST * errors.len() as i32;
  score -= WARNING_COST * warnings.len() as i32;
  if recommendations.is_empty() {
    score += CLEAN_BONUS;
  } else {
    score -= RECOMMENDATION_COST * recommendations.len() as i32;
  }
  score.clamp(0, 100) as u8
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{RunnerLevel, SessionKind};
  use crate::test_utils::{placed_session, sample_request, week_of};

  fn profile() -> RunnerProfile {
    RunnerProfile::for_level(RunnerLevel::Intermediate)
  }

  #[test]
  fn test_clean_week_scores_high() {
    // Tue quality, Thu easy, Sun long run: nothing to flag
    let week = week_of(vec![
      placed_session(SessionKind::Threshold, 3, Weekday::Tue, 10.0),
      placed_session(SessionKind::Easy, 1, Weekday::Thu, 8.0),
      placed_session(SessionKind::LongRun, 2, Weekday::Sun, 14.0),
    ]);
    let report = audit_week(&week, &sample_request(), &profile());

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert!(report.score >= 90, "score {}", report.score);
  }

  #[test]
  fn test_adjacent_hard_days_are_an_error() {
    let week = week_of(vec![
      placed_session(SessionKind::Vma, 4, Weekday::Tue, 9.0),
      placed_session(SessionKind::Threshold, 3, Weekday::Wed, 10.0),
      placed_session(SessionKind::LongRun, 2, Weekday::Sun, 14.0),
    ]);
    let report = audit_week(&week, &sample_request(), &profile());

    assert!(report
      .errors
      .iter()
      .any(|f| f.rule == "quality_spacing"));
    assert!(report.score <= 75);
  }

  #[test]
  fn test_hard_day_after_long_run_is_an_error() {
    let week = week_of(vec![
      placed_session(SessionKind::LongRun, 2, Weekday::Sat, 16.0),
      placed_session(SessionKind::Vma, 4, Weekday::Sun, 9.0),
    ]);
    let report = audit_week(&week, &sample_request(), &profile());
    assert!(report
      .errors
      .iter()
      .any(|f| f.rule == "rest_after_long_run"));
  }

  #[test]
  fn test_too_many_quality_sessions_flagged() {
    let week = week_of(vec![
      placed_session(SessionKind::Threshold, 3, Weekday::Mon, 10.0),
      placed_session(SessionKind::Vma, 4, Weekday::Wed, 9.0),
      placed_session(SessionKind::Threshold, 3, Weekday::Fri, 10.0),
    ]);
    let report = audit_week(&week, &sample_request(), &profile());
    assert!(report.errors.iter().any(|f| f.rule == "quality_count"));
  }

  #[test]
  fn test_consecutive_days_and_rest_rules() {
    let beginner = RunnerProfile::for_level(RunnerLevel::Beginner);
    // five days in a row is too much for a beginner (max 3)
    let week = week_of(vec![
      placed_session(SessionKind::Easy, 1, Weekday::Mon, 6.0),
      placed_session(SessionKind::Easy, 1, Weekday::Tue, 6.0),
      placed_session(SessionKind::Easy, 1, Weekday::Wed, 6.0),
      placed_session(SessionKind::Easy, 1, Weekday::Thu, 6.0),
      placed_session(SessionKind::Easy, 1, Weekday::Fri, 6.0),
    ]);
    let report = audit_week(&week, &sample_request(), &beginner);
    assert!(report
      .errors
      .iter()
      .any(|f| f.rule == "consecutive_days"));
    assert!(report.errors.iter().all(|f| f.rule != "rest_days"));
  }

  #[test]
  fn test_sandwiched_rest_day_warns() {
    let week = week_of(vec![
      placed_session(SessionKind::Threshold, 3, Weekday::Tue, 10.0),
      placed_session(SessionKind::Vma, 4, Weekday::Thu, 9.0),
      placed_session(SessionKind::LongRun, 2, Weekday::Sun, 14.0),
    ]);
    let report = audit_week(&week, &sample_request(), &profile());
    assert!(report
      .warnings
      .iter()
      .any(|f| f.rule == "sandwiched_rest"));
  }

  #[test]
  fn test_long_run_off_preferred_day_recommended() {
    let week = week_of(vec![
      placed_session(SessionKind::Threshold, 3, Weekday::Tue, 10.0),
      placed_session(SessionKind::LongRun, 2, Weekday::Sat, 14.0),
    ]);
    // sample request prefers the Sunday long run
    let report = audit_week(&week, &sample_request(), &profile());
    assert!(report
      .recommendations
      .iter()
      .any(|f| f.rule == "long_run_day_choice"));
  }

  #[test]
  fn test_score_formula() {
    assert_eq!(compute_score(&[], &[], &[]), 100); // clean bonus clamps at 100
    let finding = RuleFinding::new("x", "y".into());
    assert_eq!(compute_score(&[finding.clone()], &[], &[]), 85);
    assert_eq!(compute_score(&[], &[finding.clone()], &[]), 100); // 100 - 10 + 10
    assert_eq!(
      compute_score(&[], &[finding.clone()], &[finding.clone()]),
      87
    );
    // floor at zero
    let many = vec![finding; 6];
    assert_eq!(compute_score(&many, &many, &[]), 0);
  }

  #[test]
  fn test_audit_is_idempotent() {
    let week = week_of(vec![
      placed_session(SessionKind::Vma, 4, Weekday::Tue, 9.0),
      placed_session(SessionKind::Threshold, 3, Weekday::Wed, 10.0),
      placed_session(SessionKind::LongRun, 2, Weekday::Sun, 14.0),
    ]);
    let request = sample_request();
    let first = audit_week(&week, &request, &profile());
    let second = audit_week(&week, &request, &profile());
    assert_eq!(first, second);
  }
}
