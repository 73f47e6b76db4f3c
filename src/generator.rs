//! Session generation
//!
//! Turns one week's mileage envelope into a concrete set of unplaced
//! sessions: one long run, zero or more quality workouts from the template
//! catalog, a field test on test weeks, and easy runs soaking up the
//! remaining mileage. The final race week has its own, simpler generator.

use chrono::NaiveDate;

use crate::config::PlanConfig;
use crate::library::{self, round_km};
use crate::models::{
  Effort, PhaseKind, PlanRequest, Segment, SegmentName, Session, SessionKind, WeekConfig,
  Weekday, WorkoutStructure,
};
use crate::pace::{format_pace, PaceSet, Zone};
use crate::periodization::{RaceClass, RunnerProfile};

/// ---------------------------------------------------------------------------
/// Distribution Constants
/// ---------------------------------------------------------------------------

/// Share of weekly mileage given to the long run, by available-day count.
/// Fewer days concentrate more of the week into the long run.
fn long_run_share(available_days: usize) -> f64 {
  match available_days {
    0..=3 => 0.42,
    4 => 0.36,
    5 => 0.32,
    _ => 0.28,
  }
}

/// Long-run ceiling per race class: starting cap and absolute max (km).
fn long_run_cap(class: RaceClass, week_number: u32) -> f64 {
  let (base, max) = match class {
    RaceClass::Short => (12.0, 16.0),
    RaceClass::Mid => (14.0, 18.0),
    RaceClass::Half => (18.0, 24.0),
    RaceClass::Marathon => (22.0, 32.0),
  };
  (base + 0.3 * f64::from(week_number)).min(max)
}

/// Recovery weeks run the long run 20% shorter.
const RECOVERY_LONG_RUN_FACTOR: f64 = 0.8;

/// Largest easy run may not exceed this share of the long run...
const EASY_CLIP_TRIGGER: f64 = 0.85;
/// ...and is clipped down to this share when it does.
const EASY_CLIP_TARGET: f64 = 0.70;

/// Percentage splits of the remaining easy mileage, by slot count.
const EASY_SPLITS: [&[f64]; 5] = [
  &[1.0],
  &[0.55, 0.45],
  &[0.40, 0.33, 0.27],
  &[0.30, 0.27, 0.23, 0.20],
  &[0.25, 0.22, 0.20, 0.18, 0.15],
];

/// Base quality sessions per week, before level scaling.
fn base_quality_count(phase: PhaseKind) -> f64 {
  match phase {
    PhaseKind::Base => 1.0,
    PhaseKind::Quality | PhaseKind::Peak => 2.0,
    PhaseKind::Taper => 1.0,
  }
}

/// ---------------------------------------------------------------------------
/// Week Context
/// ---------------------------------------------------------------------------

/// Everything the generator needs to know about one week.
#[derive(Debug, Clone, Copy)]
pub struct WeekContext<'a> {
  pub week_number: u32,
  pub phase: PhaseKind,
  /// 0-based index of this week inside its phase.
  pub phase_week_index: u32,
  pub phase_length: u32,
  pub week_config: WeekConfig,
  pub request: &'a PlanRequest,
  pub profile: &'a RunnerProfile,
  pub paces: &'a PaceSet,
  pub config: &'a PlanConfig,
}

impl WeekContext<'_> {
  /// Load step (0-2) for template progression: the phase is cut in thirds.
  fn progression_index(&self) -> u32 {
    if self.phase_length == 0 {
      return 0;
    }
    (self.phase_week_index * 3 / self.phase_length).min(2)
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Generation
/// ---------------------------------------------------------------------------

/// Generate the unplaced session set for a regular (non-race) week.
pub fn generate_week_sessions(ctx: &WeekContext) -> Vec<Session> {
  let available_days = ctx.request.training_days.len();
  let mut sessions = Vec::new();

  let long_run = long_run_session(ctx);
  let long_km = long_run.distance_km;
  sessions.push(long_run);

  if ctx.week_config.is_test {
    sessions.push(field_test_session(
      ctx.request.race_distance_km,
      ctx.paces,
      ctx.config,
    ));
  }

  for quality in quality_sessions(ctx) {
    sessions.push(quality);
  }

  let used_km: f64 = sessions.iter().map(|s| s.distance_km).sum();
  let remaining = ctx.week_config.target_km - used_km;
  let slots = available_days.saturating_sub(sessions.len()).min(5);
  sessions.extend(easy_sessions(remaining, slots, long_km, ctx.paces));

  sessions
}

/// Quality session count for the week: phase base scaled by level, bounded
/// by the profile cap and the day budget (long run and at least one easy
/// run keep their days). Recovery weeks never hold quality work, and a
/// field test replaces one quality session.
pub fn quality_session_count(ctx: &WeekContext) -> usize {
  if ctx.week_config.is_recovery {
    return 0;
  }
  let available_days = ctx.request.training_days.len();
  let scaled =
    (base_quality_count(ctx.phase) * ctx.profile.quality_multiplier).round() as usize;
  let mut count = scaled
    .min(ctx.profile.max_quality_per_week as usize)
    .min(available_days.saturating_sub(2))
    .max(1);
  if ctx.week_config.is_test {
    count = count.saturating_sub(1);
  }
  count
}

fn quality_sessions(ctx: &WeekContext) -> Vec<Session> {
  let count = quality_session_count(ctx);
  let templates = library::templates_for(ctx.phase);
  let progression = ctx.progression_index();

  (0..count)
    .map(|i| {
      let template = &templates[(ctx.week_number as usize + i) % templates.len()];
      library::instantiate(template, progression, ctx.paces, ctx.profile, ctx.config)
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Long Run
/// ---------------------------------------------------------------------------

fn long_run_session(ctx: &WeekContext) -> Session {
  let share = long_run_share(ctx.request.training_days.len());
  let cap = long_run_cap(
    RaceClass::from_km(ctx.request.race_distance_km),
    ctx.week_number,
  );
  let mut km = (ctx.week_config.target_km * share).min(cap);
  if ctx.week_config.is_recovery {
    km *= RECOVERY_LONG_RUN_FACTOR;
  }
  let km = round_km(km.max(1.0));

  let kind = if ctx.phase == PhaseKind::Peak {
    SessionKind::SpecificLongRun
  } else if ctx.phase == PhaseKind::Quality && ctx.phase_week_index % 3 == 2 {
    SessionKind::ProgressiveLongRun
  } else {
    SessionKind::LongRun
  };

  let easy_range = format!(
    "{}-{}",
    format_pace(ctx.paces.easy_high),
    format_pace(ctx.paces.easy_low)
  );
  let (label, segments) = match kind {
    SessionKind::SpecificLongRun => {
      // race-pace finish over the last quarter
      let finish = round_km(km * 0.25);
      (
        "Specific long run".to_string(),
        vec![
          Segment {
            name: SegmentName::MainSet,
            instruction: format!("{:.1} km steady @ {easy_range}", km - finish),
          },
          Segment {
            name: SegmentName::MainSet,
            instruction: format!(
              "{finish:.1} km finish @ {}",
              format_pace(ctx.paces.race)
            ),
          },
        ],
      )
    }
    SessionKind::ProgressiveLongRun => {
      let progressive = round_km(km / 3.0);
      (
        "Progressive long run".to_string(),
        vec![
          Segment {
            name: SegmentName::MainSet,
            instruction: format!("{:.1} km easy @ {easy_range}", km - progressive),
          },
          Segment {
            name: SegmentName::MainSet,
            instruction: format!(
              "{progressive:.1} km progressive to {}",
              format_pace(ctx.paces.marathon)
            ),
          },
        ],
      )
    }
    _ => (
      "Long run".to_string(),
      vec![Segment {
        name: SegmentName::MainSet,
        instruction: format!("{km:.1} km steady @ {easy_range}"),
      }],
    ),
  };

  Session {
    kind,
    label,
    intensity: 2,
    structure: None,
    segments,
    distance_km: km,
    day: None,
    is_test: false,
    full_date: None,
  }
}

/// ---------------------------------------------------------------------------
/// Field Test
/// ---------------------------------------------------------------------------

/// 5 km time trial for 10 km races and up, otherwise a 6-minute maximal
/// test. Replaces one quality session on its week.
pub fn field_test_session(
  race_distance_km: f64,
  paces: &PaceSet,
  config: &PlanConfig,
) -> Session {
  let five_k = race_distance_km >= 10.0;
  let (label, rep) = if five_k {
    ("5 km time trial", Effort::Distance { km: 5.0 })
  } else {
    ("6-minute test", Effort::Duration { min: 6.0 })
  };

  let structure = WorkoutStructure {
    warmup_min: 20.0,
    reps: 1,
    rep,
    recovery: None,
    cooldown_min: 10.0,
    zone: Zone::Interval,
  };

  Session {
    kind: SessionKind::FieldTest,
    label: label.to_string(),
    intensity: 4,
    structure: Some(structure),
    segments: library::render_segments(&structure, paces),
    distance_km: library::estimate_distance(&structure, paces, config),
    day: None,
    is_test: true,
    full_date: None,
  }
}

/// ---------------------------------------------------------------------------
/// Easy Runs
/// ---------------------------------------------------------------------------

/// Spread the remaining mileage across easy sessions using the fixed split
/// table. The largest easy run is clipped against the long run and the
/// excess redistributed over the other slots.
pub fn easy_sessions(
  remaining_km: f64,
  slots: usize,
  long_run_km: f64,
  paces: &PaceSet,
) -> Vec<Session> {
  if slots == 0 || remaining_km < 1.0 {
    return Vec::new();
  }
  let slots = slots.min(EASY_SPLITS.len());
  let splits = EASY_SPLITS[slots - 1];

  let mut distances: Vec<f64> = splits.iter().map(|pct| remaining_km * pct).collect();

  // splits are ordered descending, so index 0 is the largest
  if distances[0] > long_run_km * EASY_CLIP_TRIGGER && slots > 1 {
    let clipped = long_run_km * EASY_CLIP_TARGET;
    let excess = distances[0] - clipped;
    distances[0] = clipped;
    let others = (slots - 1) as f64;
    for distance in distances.iter_mut().skip(1) {
      *distance += excess / others;
    }
  } else if distances[0] > long_run_km * EASY_CLIP_TRIGGER {
    distances[0] = long_run_km * EASY_CLIP_TARGET;
  }

  distances
    .into_iter()
    .filter(|km| *km >= 1.0)
    .map(|km| easy_run(round_km(km), paces))
    .collect()
}

fn easy_run(km: f64, paces: &PaceSet) -> Session {
  let easy_range = format!(
    "{}-{}",
    format_pace(paces.easy_high),
    format_pace(paces.easy_low)
  );
  Session {
    kind: SessionKind::Easy,
    label: "Easy run".to_string(),
    intensity: 1,
    structure: None,
    segments: vec![Segment {
      name: SegmentName::MainSet,
      instruction: format!("{km:.1} km easy @ {easy_range}"),
    }],
    distance_km: km,
    day: None,
    is_test: false,
    full_date: None,
  }
}

/// ---------------------------------------------------------------------------
/// Race Week
/// ---------------------------------------------------------------------------

/// Pre-race session slots, in priority order when days are scarce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreRaceSlot {
  Activation,
  Easy,
  Reminder,
}

/// Generate the final week: the race itself on its real calendar weekday,
/// then up to three pre-race sessions on the remaining available days.
///
/// A race early in the week leaves little room: the days just before it are
/// filled closest-first (activation, then easy). A race later in the week
/// anchors the activation the day before, the pace reminder about three
/// days out, and an easy run in between.
pub fn generate_race_week(
  request: &PlanRequest,
  paces: &PaceSet,
  config: &PlanConfig,
  week_start: NaiveDate,
) -> Vec<Session> {
  let race_day = Weekday::from_date(request.race_date);
  let mut sessions = vec![race_session(request, paces, race_day)];

  let mut days_before: Vec<Weekday> = request
    .training_days
    .iter()
    .copied()
    .filter(|d| d.index() < race_day.index())
    .collect();
  days_before.sort_by_key(|d| d.index());

  let mut assignments: Vec<(Weekday, PreRaceSlot)> = Vec::new();
  if race_day.index() <= 2 {
    // early race: fill closest-first with what fits
    for (i, day) in days_before.iter().rev().enumerate() {
      match i {
        0 => assignments.push((*day, PreRaceSlot::Activation)),
        1 => assignments.push((*day, PreRaceSlot::Easy)),
        _ => break,
      }
    }
  } else {
    if let Some(&activation_day) = days_before.last() {
      assignments.push((activation_day, PreRaceSlot::Activation));
    }
    let reminder_target = race_day.index().saturating_sub(3);
    let reminder_day = days_before
      .iter()
      .copied()
      .filter(|d| assignments.iter().all(|(used, _)| used != d))
      .min_by_key(|d| (i16::from(d.index()) - i16::from(reminder_target)).unsigned_abs());
    if let Some(day) = reminder_day {
      assignments.push((day, PreRaceSlot::Reminder));
    }
    let easy_day = days_before
      .iter()
      .copied()
      .filter(|d| assignments.iter().all(|(used, _)| used != d))
      .last();
    if let Some(day) = easy_day {
      assignments.push((day, PreRaceSlot::Easy));
    }
  }

  for (day, slot) in assignments {
    let mut session = match slot {
      PreRaceSlot::Activation => activation_session(paces),
      PreRaceSlot::Easy => pre_race_easy_session(paces),
      PreRaceSlot::Reminder => reminder_session(paces, config),
    };
    session.day = Some(day);
    session.full_date = Some(day.date_in_week(week_start));
    sessions.push(session);
  }

  sessions.sort_by_key(|s| s.day.map_or(u8::MAX, Weekday::index));
  sessions
}

fn race_session(request: &PlanRequest, paces: &PaceSet, race_day: Weekday) -> Session {
  Session {
    kind: SessionKind::Race,
    label: format!("Race - {:.1} km", request.race_distance_km),
    intensity: 4,
    structure: None,
    segments: vec![Segment {
      name: SegmentName::MainSet,
      instruction: format!(
        "{:.1} km race @ {}",
        request.race_distance_km,
        format_pace(paces.race)
      ),
    }],
    distance_km: round_km(request.race_distance_km),
    day: Some(race_day),
    is_test: false,
    full_date: Some(request.race_date),
  }
}

fn activation_session(paces: &PaceSet) -> Session {
  let structure = WorkoutStructure {
    warmup_min: 15.0,
    reps: 6,
    rep: Effort::Distance { km: 0.1 },
    recovery: Some(Effort::Distance { km: 0.1 }),
    cooldown_min: 5.0,
    zone: Zone::Repetition,
  };
  Session {
    kind: SessionKind::Activation,
    label: "Activation strides".to_string(),
    intensity: 2,
    structure: Some(structure),
    segments: library::render_segments(&structure, paces),
    distance_km: 4.0,
    day: None,
    is_test: false,
    full_date: None,
  }
}

fn reminder_session(paces: &PaceSet, config: &PlanConfig) -> Session {
  let structure = WorkoutStructure {
    warmup_min: 15.0,
    reps: 3,
    rep: Effort::Duration { min: 2.0 },
    recovery: Some(Effort::Duration { min: 2.0 }),
    cooldown_min: 10.0,
    zone: Zone::Race,
  };
  Session {
    kind: SessionKind::PaceReminder,
    label: "Race-pace reminder".to_string(),
    intensity: 2,
    structure: Some(structure),
    segments: library::render_segments(&structure, paces),
    distance_km: library::estimate_distance(&structure, paces, config),
    day: None,
    is_test: false,
    full_date: None,
  }
}

fn pre_race_easy_session(paces: &PaceSet) -> Session {
  easy_run(4.0, paces)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
