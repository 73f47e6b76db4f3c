//! Fatigue-aware session placement
//!
//! Assigns a week's sessions to the runner's available days. Greedy with
//! local scoring, not a solver: the long run claims its designated day,
//! hard sessions are placed one at a time on the best-scoring remaining day
//! (ties go to the earliest day), and easy runs fill what is left, largest
//! run on the freshest day. Fatigue is resimulated after every hard
//! placement.

use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::fatigue::{FatigueLevel, FatigueState};
use crate::models::{PlanRequest, Session, SessionKind, Weekday};

/// ---------------------------------------------------------------------------
/// Scoring Constants
/// ---------------------------------------------------------------------------

const BASE_SCORE: f64 = 100.0;

const EXHAUSTED_PENALTY: f64 = -40.0;
const TIRED_PENALTY: f64 = -20.0;
const FRESH_BONUS: f64 = 10.0;

const GAP_BELOW_MIN: f64 = -30.0;
const GAP_AT_MIN: f64 = -10.0;
const GAP_ABOVE_MIN: f64 = 5.0;

const ADJACENT_HARD_PENALTY: f64 = -25.0;

const TEST_MIDWEEK_BONUS: f64 = 15.0;
const TEST_AFTER_LONG_RUN_PENALTY: f64 = -20.0;

const ZONE_PREFERENCE_BONUS: f64 = 10.0;
const FIRST_DAY_PENALTY: f64 = -5.0;

const VARIANCE_PENALTY: f64 = -10.0;
const VARIANCE_TOLERANCE: f64 = 2.0;

/// ---------------------------------------------------------------------------
/// Hard-Session Categories
/// ---------------------------------------------------------------------------

/// Category used by the recovery-gap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HardKind {
  Vma,
  Threshold,
  Test,
}

fn hard_kind(session: &Session) -> Option<HardKind> {
  if session.is_test {
    return Some(HardKind::Test);
  }
  match session.kind {
    SessionKind::Vma => Some(HardKind::Vma),
    SessionKind::Threshold | SessionKind::RacePace | SessionKind::Race => {
      Some(HardKind::Threshold)
    }
    _ if session.intensity >= 3 => Some(HardKind::Threshold),
    _ => None,
  }
}

/// Minimum rest days between two hard sessions, by ordered category pair.
fn min_gap_days(previous: HardKind, next: HardKind) -> i16 {
  match (previous, next) {
    (HardKind::Test, _) | (_, HardKind::Test) => 2,
    (HardKind::Vma, HardKind::Vma) => 2,
    _ => 1,
  }
}

/// ---------------------------------------------------------------------------
/// Placement
/// ---------------------------------------------------------------------------

/// Place every session of a week onto a distinct available day.
///
/// Sessions come back sorted by day. A session the engine cannot place is a
/// structural error on the week, never silently dropped.
pub fn place_week(
  sessions: Vec<Session>,
  request: &PlanRequest,
  config: &PlanConfig,
  week_number: u32,
) -> Result<Vec<Session>, PlanError> {
  let mut free: Vec<Weekday> = request.training_days.iter().copied().collect();
  let mut placed: Vec<Session> = Vec::new();

  let mut hard: Vec<Session> = Vec::new();
  let mut easy: Vec<Session> = Vec::new();
  for session in sessions {
    if session.kind.is_long_run() {
      // the long run claims its designated day when that day is free
      if let Some(pos) = free.iter().position(|d| *d == request.long_run_day) {
        let mut session = session;
        session.day = Some(free.remove(pos));
        placed.push(session);
      } else {
        easy.push(session);
      }
    } else if session.is_hard() {
      hard.push(session);
    } else {
      easy.push(session);
    }
  }

  // tests first, then by descending intensity; the sort is stable so
  // generation order breaks remaining ties
  hard.sort_by(|a, b| {
    b.is_test
      .cmp(&a.is_test)
      .then(b.intensity.cmp(&a.intensity))
  });

  for mut session in hard {
    let fatigue = FatigueState::simulate(&placed, &request.training_days, config);
    let mut best: Option<(f64, usize)> = None;
    for (pos, &day) in free.iter().enumerate() {
      let score = score_candidate(&session, day, &placed, &fatigue, config);
      // strict comparison keeps the first (earliest) day on ties
      if best.is_none_or(|(top, _)| score > top) {
        best = Some((score, pos));
      }
    }
    let Some((_, pos)) = best else {
      return Err(PlanError::UnplaceableSession {
        week_number,
        label: session.label,
      });
    };
    session.day = Some(free.remove(pos));
    placed.push(session);
  }

  // easy runs: largest first, freshest remaining day first
  let fatigue = FatigueState::simulate(&placed, &request.training_days, config);
  easy.sort_by(|a, b| b.distance_km.total_cmp(&a.distance_km));
  free.sort_by(|a, b| {
    fatigue
      .score(*a)
      .total_cmp(&fatigue.score(*b))
      .then(a.index().cmp(&b.index()))
  });

  let mut free = free.into_iter();
  for mut session in easy {
    let Some(day) = free.next() else {
      return Err(PlanError::UnplaceableSession {
        week_number,
        label: session.label,
      });
    };
    session.day = Some(day);
    placed.push(session);
  }

  placed.sort_by_key(|s| s.day.map_or(u8::MAX, Weekday::index));
  Ok(placed)
}

/// ---------------------------------------------------------------------------
/// Scoring
/// ---------------------------------------------------------------------------

/// Score a (hard session, day) candidate. Starts at 100 and applies the
/// rule adjustments; the caller takes the highest-scoring day.
fn score_candidate(
  session: &Session,
  day: Weekday,
  placed: &[Session],
  fatigue: &FatigueState,
  config: &PlanConfig,
) -> f64 {
  let mut score = BASE_SCORE;
  let category = hard_kind(session);

  if session.intensity >= 3 || session.is_test {
    score += match fatigue.level(day, config) {
      FatigueLevel::Exhausted => EXHAUSTED_PENALTY,
      FatigueLevel::Tired => TIRED_PENALTY,
      FatigueLevel::Fresh => FRESH_BONUS,
      FatigueLevel::Moderate => 0.0,
    };

    if let (Some(category), Some((previous_day, previous_kind))) =
      (category, last_hard_before(placed, day))
    {
      let gap = i16::from(day.index()) - i16::from(previous_day.index());
      let min_gap = min_gap_days(previous_kind, category);
      score += if gap < min_gap {
        GAP_BELOW_MIN
      } else if gap == min_gap {
        GAP_AT_MIN
      } else {
        GAP_ABOVE_MIN
      };
    }

    for offset in [-1_i8, 1] {
      let adjacent = day.index() as i8 + offset;
      if adjacent < 0 {
        continue;
      }
      if let Some(adjacent) = Weekday::from_index(adjacent as u8) {
        if placed
          .iter()
          .any(|s| s.day == Some(adjacent) && s.intensity >= 3)
        {
          score += ADJACENT_HARD_PENALTY;
        }
      }
    }

    if day == Weekday::Mon {
      score += FIRST_DAY_PENALTY;
    }
  }

  if session.is_test {
    if (1..=3).contains(&day.index()) {
      score += TEST_MIDWEEK_BONUS;
    }
    if let Some(previous) = day.index().checked_sub(1).and_then(Weekday::from_index) {
      if placed
        .iter()
        .any(|s| s.day == Some(previous) && s.kind.is_long_run())
      {
        score += TEST_AFTER_LONG_RUN_PENALTY;
      }
    }
  }

  match category {
    Some(HardKind::Vma) if config.vma_preferred_days.contains(&day) => {
      score += ZONE_PREFERENCE_BONUS;
    }
    Some(HardKind::Threshold) if config.threshold_preferred_days.contains(&day) => {
      score += ZONE_PREFERENCE_BONUS;
    }
    _ => {}
  }

  let mut days: Vec<u8> = placed.iter().filter_map(|s| s.day.map(Weekday::index)).collect();
  let variance_before = gap_variance(&days);
  days.push(day.index());
  if gap_variance(&days) - variance_before > VARIANCE_TOLERANCE {
    score += VARIANCE_PENALTY;
  }

  score
}

/// Most recently placed hard session on a day strictly before `day`.
fn last_hard_before(placed: &[Session], day: Weekday) -> Option<(Weekday, HardKind)> {
  placed
    .iter()
    .filter_map(|s| {
      let placed_day = s.day?;
      let kind = hard_kind(s)?;
      (placed_day.index() < day.index()).then_some((placed_day, kind))
    })
    .max_by_key(|(d, _)| d.index())
}

/// Variance of the gaps between consecutive session days.
fn gap_variance(days: &[u8]) -> f64 {
  let mut days = days.to_vec();
  days.sort_unstable();
  if days.len() < 2 {
    return 0.0;
  }
  let gaps: Vec<f64> = days.windows(2).map(|w| f64::from(w[1] - w[0])).collect();
  let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
  gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
