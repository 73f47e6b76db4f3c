//! Training stress accounting
//!
//! Unitless load estimate per session and week, used for reporting and the
//! schedule audit. Placement never looks at these numbers.

use crate::models::{Session, Week};
use crate::pace::PaceSet;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// Load factor by intensity 1 through 4.
const INTENSITY_FACTORS: [f64; 4] = [0.6, 0.75, 0.95, 1.15];

/// Stand-in easy pace when the pace set has none.
const FALLBACK_EASY_S_PER_KM: f64 = 403.0;

/// ---------------------------------------------------------------------------
/// Stress Scores
/// ---------------------------------------------------------------------------

/// Training stress of one session: estimated duration at the easy pace,
/// weighted by the intensity factor.
pub fn session_tss(session: &Session, paces: &PaceSet) -> f64 {
  let easy_pace = match paces.easy_low {
    Some(pace) if pace > 0.0 => pace,
    _ => FALLBACK_EASY_S_PER_KM,
  };
  let duration_min = session.distance_km * easy_pace / 60.0;
  let factor = INTENSITY_FACTORS[(session.intensity.clamp(1, 4) - 1) as usize];
  round_tss(duration_min * factor)
}

/// Week stress is the plain sum over its sessions.
pub fn week_tss(sessions: &[Session], paces: &PaceSet) -> f64 {
  round_tss(sessions.iter().map(|s| session_tss(s, paces)).sum())
}

/// Convenience for a finished week.
pub fn recompute_week(week: &mut Week, paces: &PaceSet) {
  week.tss = week_tss(&week.sessions, paces);
}

fn round_tss(tss: f64) -> f64 {
  (tss * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
