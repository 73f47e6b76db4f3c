//! Plan orchestration
//!
//! The core entry point. Weeks are generated strictly in sequence because
//! week N's mileage depends on week N-1's accumulated state; placement is
//! still per-week and independent. Everything is synchronous: a call either
//! returns a complete plan or fails with a `PlanError` before any partial
//! artifact escapes.

use tracing::debug;

use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::generator::{self, WeekContext};
use crate::load;
use crate::models::{PhaseKind, PlanRequest, TrainingPlan, Week};
use crate::pace::{self, PaceSet};
use crate::periodization::{self, RunnerProfile};
use crate::placement;

/// Generate a complete training plan from a validated request.
pub fn generate_plan(
  request: &PlanRequest,
  config: &PlanConfig,
) -> Result<TrainingPlan, PlanError> {
  request.validate()?;
  let total_weeks = request.total_weeks();

  let mut warnings = Vec::new();
  let (vdot, warning) = pace::vdot_from_performance(&request.performance);
  warnings.extend(warning);
  let (paces, warning) = PaceSet::for_race(vdot, request.race_distance_km);
  warnings.extend(warning);
  warnings.extend(paces.validate_ordering());

  let phases = periodization::build_phases(total_weeks, request.race_distance_km)?;
  let taper_weeks = phases
    .iter()
    .find(|p| p.kind == PhaseKind::Taper)
    .map_or(0, |p| p.week_count);

  let profile = RunnerProfile::for_level(request.runner_level);
  let target_km = periodization::target_weekly_km(request.race_distance_km, vdot, &profile);
  let week_configs = periodization::build_week_configs(
    total_weeks,
    taper_weeks,
    request.current_weekly_km,
    target_km,
    &profile,
    config.min_taper_km,
  );

  debug!(total_weeks, vdot, target_km, "generating plan");

  let first_week_start = request.first_week_start();
  let mut weeks = Vec::with_capacity(total_weeks as usize);

  for week_number in 1..=total_weeks {
    let week_start =
      first_week_start + chrono::Duration::weeks(i64::from(week_number) - 1);
    let (phase, phase_week_index, phase_length) =
      periodization::phase_of_week(&phases, week_number);
    let week_config = week_configs[(week_number - 1) as usize];

    let mut sessions = if week_number == total_weeks {
      // the race week picks its own days around the race date
      generator::generate_race_week(request, &paces, config, week_start)
    } else {
      let ctx = WeekContext {
        week_number,
        phase,
        phase_week_index,
        phase_length,
        week_config,
        request,
        profile: &profile,
        paces: &paces,
        config,
      };
      let generated = generator::generate_week_sessions(&ctx);
      placement::place_week(generated, request, config, week_number)?
    };

    for session in &mut sessions {
      if session.full_date.is_none() {
        session.full_date = session.day.map(|d| d.date_in_week(week_start));
      }
    }

    let total_km = round_km(sessions.iter().map(|s| s.distance_km).sum());
    let tss = load::week_tss(&sessions, &paces);
    weeks.push(Week {
      week_number,
      phase,
      start_date: week_start,
      total_km,
      sessions,
      tss,
    });
  }

  Ok(TrainingPlan {
    weeks,
    paces,
    request: request.clone(),
    warnings,
  })
}

fn round_km(km: f64) -> f64 {
  (km * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
