//! VDOT pace model
//!
//! Converts a single fitness index (VDOT) into the full set of training
//! paces, predicts race pace for arbitrary distances, and inverts a known
//! performance back into a VDOT. All paces are seconds per kilometer;
//! smaller is faster.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::PerformanceInput;

/// ---------------------------------------------------------------------------
/// Physiological Constants
/// ---------------------------------------------------------------------------

pub const VDOT_MIN: f64 = 20.0;
pub const VDOT_MAX: f64 = 90.0;

/// Fallback when the fitness input is out of range or non-computable.
const DEFAULT_VDOT: f64 = 40.0;

/// Fraction of VO2max sustained in each training zone.
const PCT_EASY_LOW: f64 = 0.62;
const PCT_EASY_HIGH: f64 = 0.70;
const PCT_MARATHON: f64 = 0.81;
const PCT_THRESHOLD: f64 = 0.88;
const PCT_INTERVAL: f64 = 0.97;

/// Repetition work is run ~6% faster than interval velocity.
const REPETITION_VELOCITY_GAIN: f64 = 1.06;

/// Oxygen cost of running at velocity v (m/min):
/// VO2 = VO2_C + VO2_B * v + VO2_A * v^2
const VO2_A: f64 = 0.000104;
const VO2_B: f64 = 0.182258;
const VO2_C: f64 = -4.60;

/// Fraction of VO2max sustainable for a duration t (minutes):
/// f(t) = 0.8 + 0.1894393 e^(-0.012778 t) + 0.2989558 e^(-0.1932605 t)
const FRAC_BASE: f64 = 0.8;
const FRAC_SLOW_COEF: f64 = 0.189_439_3;
const FRAC_SLOW_DECAY: f64 = -0.012_778;
const FRAC_FAST_COEF: f64 = 0.298_955_8;
const FRAC_FAST_DECAY: f64 = -0.193_260_5;

/// Cubic race-duration predictor in minutes for a distance in km, fitted to
/// mid-range performance tables. Only used to seed the intensity fraction,
/// which varies slowly with duration.
const DURATION_C1: f64 = 3.82;
const DURATION_C2: f64 = 0.0358;
const DURATION_C3: f64 = -0.000457;

/// Default pace table, equivalent to VDOT 40. Substituted whenever the
/// fitness input cannot be used.
const DEFAULT_PACES: PaceSet = PaceSet {
  easy_low: Some(403.0),
  easy_high: Some(367.0),
  marathon: Some(327.0),
  threshold: Some(306.0),
  interval: Some(283.0),
  repetition: Some(267.0),
  race: None,
};

/// ---------------------------------------------------------------------------
/// Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
  EasyLow,
  EasyHigh,
  Marathon,
  Threshold,
  Interval,
  Repetition,
  /// Goal-race pace for the plan's race distance.
  Race,
}

impl Zone {
  pub fn label(self) -> &'static str {
    match self {
      Self::EasyLow => "easy",
      Self::EasyHigh => "steady",
      Self::Marathon => "marathon",
      Self::Threshold => "threshold",
      Self::Interval => "interval",
      Self::Repetition => "repetition",
      Self::Race => "race pace",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Pace Set
/// ---------------------------------------------------------------------------

/// Training paces in seconds per kilometer. `None` marks a pace the model
/// could not compute ("N/A" on display); that only happens for degenerate
/// inputs, never for a VDOT inside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceSet {
  pub easy_low: Option<f64>,
  pub easy_high: Option<f64>,
  pub marathon: Option<f64>,
  pub threshold: Option<f64>,
  pub interval: Option<f64>,
  pub repetition: Option<f64>,
  pub race: Option<f64>,
}

impl PaceSet {
  /// Derive all training paces from a fitness index.
  ///
  /// An index outside [20, 90] is recovered by substituting the documented
  /// default table; the returned warning carries that fact to the caller.
  pub fn from_vdot(vdot: f64) -> (Self, Option<String>) {
    if !(VDOT_MIN..=VDOT_MAX).contains(&vdot) || !vdot.is_finite() {
      warn!(vdot, "fitness index out of range, using default pace table");
      return (
        DEFAULT_PACES,
        Some(format!(
          "fitness index {vdot:.1} outside [{VDOT_MIN:.0}, {VDOT_MAX:.0}]; default paces applied"
        )),
      );
    }

    let interval_velocity = velocity_for_vo2(vdot * PCT_INTERVAL);
    let repetition = interval_velocity
      .map(|v| v * REPETITION_VELOCITY_GAIN)
      .and_then(pace_for_velocity);

    let paces = Self {
      easy_low: zone_pace(vdot, PCT_EASY_LOW),
      easy_high: zone_pace(vdot, PCT_EASY_HIGH),
      marathon: zone_pace(vdot, PCT_MARATHON),
      threshold: zone_pace(vdot, PCT_THRESHOLD),
      interval: interval_velocity.and_then(pace_for_velocity),
      repetition,
      race: None,
    };
    (paces, None)
  }

  /// Same as `from_vdot`, with the goal-race pace filled in.
  pub fn for_race(vdot: f64, race_distance_km: f64) -> (Self, Option<String>) {
    let (mut paces, warning) = Self::from_vdot(vdot);
    // the race pace still reflects the real index even when the training
    // table was substituted, as long as the index is usable at all
    let effective = if vdot.is_finite() {
      vdot.clamp(VDOT_MIN, VDOT_MAX)
    } else {
      DEFAULT_VDOT
    };
    paces.race = race_pace(effective, race_distance_km);
    (paces, warning)
  }

  pub fn get(&self, zone: Zone) -> Option<f64> {
    match zone {
      Zone::EasyLow => self.easy_low,
      Zone::EasyHigh => self.easy_high,
      Zone::Marathon => self.marathon,
      Zone::Threshold => self.threshold,
      Zone::Interval => self.interval,
      Zone::Repetition => self.repetition,
      Zone::Race => self.race,
    }
  }

  /// Check the expected ordering: repetition < interval < threshold <
  /// marathon < easy-high < easy-low. Violations are quality signals for
  /// the caller, never blocking.
  pub fn validate_ordering(&self) -> Vec<String> {
    let ordered = [
      (Zone::Repetition, self.repetition),
      (Zone::Interval, self.interval),
      (Zone::Threshold, self.threshold),
      (Zone::Marathon, self.marathon),
      (Zone::EasyHigh, self.easy_high),
      (Zone::EasyLow, self.easy_low),
    ];

    let mut violations = Vec::new();
    for pair in ordered.windows(2) {
      let ((faster_zone, faster), (slower_zone, slower)) = (pair[0], pair[1]);
      match (faster, slower) {
        (Some(f), Some(s)) if f >= s => {
          let msg = format!(
            "{} pace ({:.0} s/km) is not faster than {} pace ({:.0} s/km)",
            faster_zone.label(),
            f,
            slower_zone.label(),
            s
          );
          warn!("{msg}");
          violations.push(msg);
        }
        (None, _) | (_, None) => {
          violations.push(format!(
            "{} or {} pace is not computable",
            faster_zone.label(),
            slower_zone.label()
          ));
        }
        _ => {}
      }
    }
    violations
  }
}

/// ---------------------------------------------------------------------------
/// Velocity / VO2 Conversions
/// ---------------------------------------------------------------------------

fn zone_pace(vdot: f64, pct: f64) -> Option<f64> {
  velocity_for_vo2(vdot * pct).and_then(pace_for_velocity)
}

/// Oxygen cost of running at `velocity` m/min.
fn vo2_for_velocity(velocity: f64) -> f64 {
  VO2_C + VO2_B * velocity + VO2_A * velocity * velocity
}

/// Invert the quadratic oxygen-cost relation. A negative discriminant
/// resolves to no velocity, which propagates as an "N/A" pace.
fn velocity_for_vo2(vo2: f64) -> Option<f64> {
  let discriminant = VO2_B * VO2_B - 4.0 * VO2_A * (VO2_C - vo2);
  if discriminant < 0.0 {
    return None;
  }
  let velocity = (-VO2_B + discriminant.sqrt()) / (2.0 * VO2_A);
  (velocity > 0.0).then_some(velocity)
}

/// Seconds per kilometer at `velocity` m/min.
fn pace_for_velocity(velocity: f64) -> Option<f64> {
  (velocity > 0.0).then(|| 60_000.0 / velocity)
}

/// Fraction of VO2max sustainable for `minutes` of racing.
fn intensity_fraction(minutes: f64) -> f64 {
  FRAC_BASE
    + FRAC_SLOW_COEF * (FRAC_SLOW_DECAY * minutes).exp()
    + FRAC_FAST_COEF * (FRAC_FAST_DECAY * minutes).exp()
}

/// Rough finishing-time estimate in minutes for a race of `distance_km`.
fn estimated_duration_min(distance_km: f64) -> f64 {
  let d = distance_km.clamp(0.0, 60.0);
  DURATION_C1 * d + DURATION_C2 * d * d + DURATION_C3 * d * d * d
}

/// ---------------------------------------------------------------------------
/// Race Prediction
/// ---------------------------------------------------------------------------

/// Predicted race pace (s/km) for `distance_km` at fitness `vdot`.
pub fn race_pace(vdot: f64, distance_km: f64) -> Option<f64> {
  if distance_km <= 0.0 {
    return None;
  }
  let duration = estimated_duration_min(distance_km);
  let target_vo2 = vdot * intensity_fraction(duration);
  velocity_for_vo2(target_vo2).and_then(pace_for_velocity)
}

/// Predicted finishing time in seconds.
pub fn predicted_race_seconds(vdot: f64, distance_km: f64) -> Option<f64> {
  race_pace(vdot, distance_km).map(|pace| pace * distance_km)
}

/// Derive the fitness index from a measured performance, clamped to the
/// supported range. A non-computable input recovers to the default index
/// with a warning, never an error.
pub fn vdot_from_performance(performance: &PerformanceInput) -> (f64, Option<String>) {
  let (distance_km, minutes) = match *performance {
    PerformanceInput::RaceResult {
      distance_km,
      time_seconds,
    } => (distance_km, time_seconds / 60.0),
    PerformanceInput::FixedDurationTest { distance_km } => (distance_km, 6.0),
  };

  if distance_km <= 0.0 || minutes <= 0.0 || !distance_km.is_finite() || !minutes.is_finite() {
    warn!(
      distance_km,
      minutes, "performance input not computable, using default fitness index"
    );
    return (
      DEFAULT_VDOT,
      Some(format!(
        "performance input not computable; default fitness index {DEFAULT_VDOT:.0} applied"
      )),
    );
  }

  let velocity = distance_km * 1000.0 / minutes;
  let vdot = vo2_for_velocity(velocity) / intensity_fraction(minutes);
  if !vdot.is_finite() {
    return (
      DEFAULT_VDOT,
      Some(format!(
        "performance input not computable; default fitness index {DEFAULT_VDOT:.0} applied"
      )),
    );
  }
  (vdot.clamp(VDOT_MIN, VDOT_MAX), None)
}

/// ---------------------------------------------------------------------------
/// Display
/// ---------------------------------------------------------------------------

/// Canonical "M:SS/km" rendering, "N/A" when no pace is computable.
pub fn format_pace(seconds_per_km: Option<f64>) -> String {
  match seconds_per_km {
    Some(secs) if secs.is_finite() && secs > 0.0 => {
      let total = secs.round() as u64;
      format!("{}:{:02}/km", total / 60, total % 60)
    }
    _ => "N/A".to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_vdot_50_interval_pace() {
    let (paces, warning) = PaceSet::from_vdot(50.0);
    assert!(warning.is_none());

    // Interval pace at VDOT 50 is about 3:56/km
    let interval = paces.interval.unwrap();
    assert!(
      (interval - 236.0).abs() < 2.0,
      "interval pace should be ~236 s/km, got {interval:.1}"
    );

    // Repetition runs on a 6% velocity gain, about 223 s/km
    let repetition = paces.repetition.unwrap();
    assert!(
      (repetition - 223.0).abs() < 2.0,
      "repetition pace should be ~223 s/km, got {repetition:.1}"
    );
    assert!(repetition < interval);
  }

  #[test]
  fn test_pace_ordering_holds_across_range() {
    // Property: ordering holds for every index in [20, 90]
    for vdot10 in 200..=900 {
      let vdot = f64::from(vdot10) / 10.0;
      let (paces, _) = PaceSet::from_vdot(vdot);
      assert!(
        paces.validate_ordering().is_empty(),
        "ordering violated at vdot {vdot}"
      );
    }
  }

  #[test]
  fn test_out_of_range_vdot_uses_default_table() {
    let (low, warning_low) = PaceSet::from_vdot(12.0);
    assert!(warning_low.is_some());
    assert_eq!(low, DEFAULT_PACES);

    let (high, warning_high) = PaceSet::from_vdot(95.0);
    assert!(warning_high.is_some());
    assert_eq!(high, DEFAULT_PACES);

    // The default table itself must satisfy the ordering
    assert!(DEFAULT_PACES.validate_ordering().is_empty());
  }

  #[test]
  fn test_race_prediction_10k() {
    // VDOT 50 predicts ~41:20 for 10 km
    let seconds = predicted_race_seconds(50.0, 10.0).unwrap();
    assert!(
      (seconds - 2480.0).abs() < 60.0,
      "10k at VDOT 50 should be ~41:20, got {seconds:.0}s"
    );

    // Race pace sits between threshold and interval for a 10k
    let (paces, _) = PaceSet::for_race(50.0, 10.0);
    let race = paces.race.unwrap();
    assert!(race > paces.interval.unwrap());
    assert!(race < paces.threshold.unwrap());
  }

  #[test]
  fn test_vdot_round_trips_through_performance() {
    let seconds = predicted_race_seconds(50.0, 10.0).unwrap();
    let (vdot, warning) = vdot_from_performance(&PerformanceInput::RaceResult {
      distance_km: 10.0,
      time_seconds: seconds,
    });
    assert!(warning.is_none());
    assert!((vdot - 50.0).abs() < 0.5, "expected ~50, got {vdot:.2}");
  }

  #[test]
  fn test_fixed_duration_test_input() {
    // 1.5 km in 6 minutes is a mid-pack runner
    let (vdot, warning) = vdot_from_performance(&PerformanceInput::FixedDurationTest {
      distance_km: 1.5,
    });
    assert!(warning.is_none());
    assert!((vdot - 44.4).abs() < 1.0, "expected ~44.4, got {vdot:.2}");
  }

  #[test]
  fn test_non_computable_performance_recovers() {
    let (vdot, warning) = vdot_from_performance(&PerformanceInput::RaceResult {
      distance_km: 0.0,
      time_seconds: 1200.0,
    });
    assert_eq!(vdot, DEFAULT_VDOT);
    assert!(warning.unwrap().contains("default fitness index"));
  }

  #[test]
  fn test_performance_clamps_to_supported_range() {
    // A world-record-beating 10k clamps at the ceiling
    let (vdot, _) = vdot_from_performance(&PerformanceInput::RaceResult {
      distance_km: 10.0,
      time_seconds: 20.0 * 60.0,
    });
    assert_eq!(vdot, VDOT_MAX);
  }

  #[test]
  fn test_format_pace() {
    assert_eq!(format_pace(Some(236.0)), "3:56/km");
    assert_eq!(format_pace(Some(360.0)), "6:00/km");
    assert_eq!(format_pace(None), "N/A");
  }
}
