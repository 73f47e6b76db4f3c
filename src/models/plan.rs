//! Plan artifact types
//!
//! The `TrainingPlan` is the single artifact that outlives generation. The
//! rendering and editor layers traverse it read-only and mutate it only
//! through the `move_session`/`swap_sessions` contract on `Week`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::{PlanRequest, Weekday};
use crate::pace::{PaceSet, Zone};

/// ---------------------------------------------------------------------------
/// Phases
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
  Base,
  Quality,
  Peak,
  Taper,
}

impl PhaseKind {
  pub fn name(self) -> &'static str {
    match self {
      Self::Base => "base",
      Self::Quality => "quality",
      Self::Peak => "peak",
      Self::Taper => "taper",
    }
  }
}

impl std::fmt::Display for PhaseKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// One periodization phase. Week counts across all phases sum exactly to
/// the total plan length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
  pub kind: PhaseKind,
  pub week_count: u32,
}

/// Per-week load envelope, produced before any session content exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekConfig {
  pub target_km: f64,
  pub is_recovery: bool,
  pub is_test: bool,
}

/// ---------------------------------------------------------------------------
/// Sessions
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  Easy,
  LongRun,
  /// Long run with a progressive-pace back half (quality phase, every third week).
  ProgressiveLongRun,
  /// Long run with a race-pace finishing segment (peak phase).
  SpecificLongRun,
  Threshold,
  Vma,
  RacePace,
  FieldTest,
  Race,
  /// Short pre-race pace reminder.
  PaceReminder,
  /// Pre-race activation (strides).
  Activation,
}

impl SessionKind {
  pub fn is_long_run(self) -> bool {
    matches!(
      self,
      Self::LongRun | Self::ProgressiveLongRun | Self::SpecificLongRun
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentName {
  WarmUp,
  MainSet,
  Recovery,
  CoolDown,
}

/// One human-readable instruction line of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
  pub name: SegmentName,
  pub instruction: String,
}

/// A single effort, either a fixed distance or a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effort {
  Distance { km: f64 },
  Duration { min: f64 },
}

/// Structured workout descriptor. The segment text is derived from these
/// numeric fields at generation time and never parsed back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStructure {
  pub warmup_min: f64,
  pub reps: u32,
  pub rep: Effort,
  pub recovery: Option<Effort>,
  pub cooldown_min: f64,
  pub zone: Zone,
}

/// One workout. Created without a day by the session generator; the
/// placement engine assigns `day`, the planner stamps `full_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub kind: SessionKind,
  pub label: String,
  /// 1 (easy) through 4 (maximal).
  pub intensity: u8,
  pub structure: Option<WorkoutStructure>,
  pub segments: Vec<Segment>,
  pub distance_km: f64,
  pub day: Option<Weekday>,
  pub is_test: bool,
  pub full_date: Option<NaiveDate>,
}

impl Session {
  /// Hard sessions drive the spacing rules: intensity 3+ or any field test.
  pub fn is_hard(&self) -> bool {
    self.intensity >= 3 || self.is_test
  }
}

/// ---------------------------------------------------------------------------
/// Weeks
/// ---------------------------------------------------------------------------

/// One plan week. Owns its sessions, kept ordered by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
  pub week_number: u32,
  pub phase: PhaseKind,
  pub start_date: NaiveDate,
  pub total_km: f64,
  pub sessions: Vec<Session>,
  pub tss: f64,
}

impl Week {
  pub fn session_on(&self, day: Weekday) -> Option<&Session> {
    self.sessions.iter().find(|s| s.day == Some(day))
  }

  /// Move one session to another day of the same week. Atomic: updates
  /// `day`, recomputes `full_date` and re-sorts. No other week is touched.
  pub fn move_session(&mut self, index: usize, new_day: Weekday) -> Result<(), PlanError> {
    if index >= self.sessions.len() {
      return Err(PlanError::InvalidRequest(format!(
        "no session at index {index}"
      )));
    }
    let occupied = self
      .sessions
      .iter()
      .enumerate()
      .any(|(i, s)| i != index && s.day == Some(new_day));
    if occupied {
      return Err(PlanError::InvalidRequest(format!(
        "{} already holds a session",
        new_day
      )));
    }
    let start = self.start_date;
    let session = &mut self.sessions[index];
    session.day = Some(new_day);
    session.full_date = Some(new_day.date_in_week(start));
    self.sort_by_day();
    Ok(())
  }

  /// Swap the days of two sessions of this week. Atomic, same contract as
  /// `move_session`.
  pub fn swap_sessions(&mut self, a: usize, b: usize) -> Result<(), PlanError> {
    if a >= self.sessions.len() || b >= self.sessions.len() {
      return Err(PlanError::InvalidRequest("session index out of range".into()));
    }
    if a == b {
      return Ok(());
    }
    let day_a = self.sessions[a].day;
    let day_b = self.sessions[b].day;
    let start = self.start_date;
    self.sessions[a].day = day_b;
    self.sessions[a].full_date = day_b.map(|d| d.date_in_week(start));
    self.sessions[b].day = day_a;
    self.sessions[b].full_date = day_a.map(|d| d.date_in_week(start));
    self.sort_by_day();
    Ok(())
  }

  pub fn sort_by_day(&mut self) {
    self
      .sessions
      .sort_by_key(|s| s.day.map_or(u8::MAX, Weekday::index));
  }
}

/// ---------------------------------------------------------------------------
/// Training Plan
/// ---------------------------------------------------------------------------

/// Top-level artifact returned by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
  pub weeks: Vec<Week>,
  pub paces: PaceSet,
  /// The request the plan was generated from, kept verbatim for export.
  pub request: PlanRequest,
  /// Non-fatal degradations encountered during generation.
  pub warnings: Vec<String>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
