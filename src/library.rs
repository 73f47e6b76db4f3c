//! Workout template catalog
//!
//! One parameterized catalog replaces per-level template copies: templates
//! are keyed by phase, carry a three-step progression of structured
//! descriptors, and the runner profile's `rep_scale` adapts them per level.
//! The human-readable segment text is derived from the descriptor once, at
//! instantiation; nothing ever parses it back.

use crate::config::PlanConfig;
use crate::models::{
  Effort, Segment, SegmentName, Session, SessionKind, PhaseKind, WorkoutStructure,
};
use crate::pace::{format_pace, PaceSet, Zone};
use crate::periodization::RunnerProfile;

/// ---------------------------------------------------------------------------
/// Estimation Constants
/// ---------------------------------------------------------------------------

/// Every generated session renders and exports with at least this distance.
const MIN_SESSION_KM: f64 = 1.0;

/// Stand-in pace when a zone pace is not computable. Matches the default
/// table's easy pace.
const FALLBACK_PACE_S_PER_KM: f64 = 403.0;

/// ---------------------------------------------------------------------------
/// Template Catalog
/// ---------------------------------------------------------------------------

/// The shape of one progression step: explicit numeric fields only.
#[derive(Debug, Clone, Copy)]
pub struct StructureSpec {
  pub warmup_min: f64,
  pub reps: u32,
  pub rep: Effort,
  pub recovery: Option<Effort>,
  pub cooldown_min: f64,
}

/// Catalog entry for one workout type within a phase.
#[derive(Debug, Clone, Copy)]
pub struct SessionTemplate {
  pub label: &'static str,
  pub kind: SessionKind,
  pub intensity: u8,
  pub zone: Zone,
  /// Progression steps for the early/middle/late third of the phase.
  pub steps: [StructureSpec; 3],
}

const fn step(
  warmup_min: f64,
  reps: u32,
  rep: Effort,
  recovery: Option<Effort>,
  cooldown_min: f64,
) -> StructureSpec {
  StructureSpec {
    warmup_min,
    reps,
    rep,
    recovery,
    cooldown_min,
  }
}

static BASE_TEMPLATES: [SessionTemplate; 2] = [
  SessionTemplate {
    label: "Tempo run",
    kind: SessionKind::Threshold,
    intensity: 3,
    zone: Zone::Threshold,
    steps: [
      step(15.0, 1, Effort::Duration { min: 15.0 }, None, 10.0),
      step(15.0, 1, Effort::Duration { min: 20.0 }, None, 10.0),
      step(15.0, 1, Effort::Duration { min: 25.0 }, None, 10.0),
    ],
  },
  SessionTemplate {
    label: "Hill repeats",
    kind: SessionKind::Vma,
    intensity: 3,
    zone: Zone::Interval,
    steps: [
      step(
        15.0,
        8,
        Effort::Duration { min: 1.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        15.0,
        10,
        Effort::Duration { min: 1.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        15.0,
        12,
        Effort::Duration { min: 1.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
    ],
  },
];

static QUALITY_TEMPLATES: [SessionTemplate; 3] = [
  SessionTemplate {
    label: "Short intervals",
    kind: SessionKind::Vma,
    intensity: 4,
    zone: Zone::Interval,
    steps: [
      step(
        20.0,
        8,
        Effort::Distance { km: 0.4 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
      step(
        20.0,
        10,
        Effort::Distance { km: 0.4 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
      step(
        20.0,
        12,
        Effort::Distance { km: 0.4 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
    ],
  },
  SessionTemplate {
    label: "Threshold intervals",
    kind: SessionKind::Threshold,
    intensity: 3,
    zone: Zone::Threshold,
    steps: [
      step(
        20.0,
        2,
        Effort::Duration { min: 8.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        20.0,
        3,
        Effort::Duration { min: 8.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        20.0,
        4,
        Effort::Duration { min: 8.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
    ],
  },
  SessionTemplate {
    label: "Long intervals",
    kind: SessionKind::Vma,
    intensity: 4,
    zone: Zone::Interval,
    steps: [
      step(
        20.0,
        4,
        Effort::Distance { km: 0.8 },
        Some(Effort::Distance { km: 0.4 }),
        10.0,
      ),
      step(
        20.0,
        5,
        Effort::Distance { km: 0.8 },
        Some(Effort::Distance { km: 0.4 }),
        10.0,
      ),
      step(
        20.0,
        6,
        Effort::Distance { km: 0.8 },
        Some(Effort::Distance { km: 0.4 }),
        10.0,
      ),
    ],
  },
];

static PEAK_TEMPLATES: [SessionTemplate; 3] = [
  SessionTemplate {
    label: "Race-pace intervals",
    kind: SessionKind::RacePace,
    intensity: 3,
    zone: Zone::Race,
    steps: [
      step(
        20.0,
        2,
        Effort::Duration { min: 12.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
      step(
        20.0,
        3,
        Effort::Duration { min: 12.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
      step(
        20.0,
        3,
        Effort::Duration { min: 15.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
    ],
  },
  SessionTemplate {
    label: "Threshold blocks",
    kind: SessionKind::Threshold,
    intensity: 3,
    zone: Zone::Threshold,
    steps: [
      step(
        20.0,
        2,
        Effort::Duration { min: 12.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
      step(
        20.0,
        2,
        Effort::Duration { min: 15.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
      step(
        20.0,
        3,
        Effort::Duration { min: 12.0 },
        Some(Effort::Duration { min: 3.0 }),
        10.0,
      ),
    ],
  },
  SessionTemplate {
    label: "Speed maintenance",
    kind: SessionKind::Vma,
    intensity: 4,
    zone: Zone::Interval,
    steps: [
      step(
        20.0,
        6,
        Effort::Distance { km: 0.3 },
        Some(Effort::Duration { min: 1.5 }),
        10.0,
      ),
      step(
        20.0,
        8,
        Effort::Distance { km: 0.3 },
        Some(Effort::Duration { min: 1.5 }),
        10.0,
      ),
      step(
        20.0,
        10,
        Effort::Distance { km: 0.3 },
        Some(Effort::Duration { min: 1.5 }),
        10.0,
      ),
    ],
  },
];

static TAPER_TEMPLATES: [SessionTemplate; 2] = [
  SessionTemplate {
    label: "Sharpener",
    kind: SessionKind::Vma,
    intensity: 4,
    zone: Zone::Repetition,
    steps: [
      step(
        15.0,
        6,
        Effort::Distance { km: 0.2 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
      step(
        15.0,
        6,
        Effort::Distance { km: 0.2 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
      step(
        15.0,
        8,
        Effort::Distance { km: 0.2 },
        Some(Effort::Distance { km: 0.2 }),
        10.0,
      ),
    ],
  },
  SessionTemplate {
    label: "Race-pace reminder",
    kind: SessionKind::RacePace,
    intensity: 3,
    zone: Zone::Race,
    steps: [
      step(
        15.0,
        2,
        Effort::Duration { min: 5.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        15.0,
        3,
        Effort::Duration { min: 5.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
      step(
        15.0,
        3,
        Effort::Duration { min: 5.0 },
        Some(Effort::Duration { min: 2.0 }),
        10.0,
      ),
    ],
  },
];

/// Ordered workout variants for a phase. The session generator rotates
/// through the list by week index.
pub fn templates_for(phase: PhaseKind) -> &'static [SessionTemplate] {
  match phase {
    PhaseKind::Base => &BASE_TEMPLATES,
    PhaseKind::Quality => &QUALITY_TEMPLATES,
    PhaseKind::Peak => &PEAK_TEMPLATES,
    PhaseKind::Taper => &TAPER_TEMPLATES,
  }
}

/// ---------------------------------------------------------------------------
/// Instantiation
/// ---------------------------------------------------------------------------

/// Turn a catalog entry into a concrete, unplaced session.
pub fn instantiate(
  template: &SessionTemplate,
  progression_index: u32,
  paces: &PaceSet,
  profile: &RunnerProfile,
  config: &PlanConfig,
) -> Session {
  let step = template.steps[progression_index.min(2) as usize];
  let reps = scale_reps(step.reps, profile.rep_scale);

  let structure = WorkoutStructure {
    warmup_min: step.warmup_min,
    reps,
    rep: step.rep,
    recovery: step.recovery,
    cooldown_min: step.cooldown_min,
    zone: template.zone,
  };

  Session {
    kind: template.kind,
    label: template.label.to_string(),
    intensity: template.intensity,
    structure: Some(structure),
    segments: render_segments(&structure, paces),
    distance_km: estimate_distance(&structure, paces, config),
    day: None,
    is_test: false,
    full_date: None,
  }
}

fn scale_reps(reps: u32, rep_scale: f64) -> u32 {
  ((f64::from(reps) * rep_scale).round() as u32).max(1)
}

/// ---------------------------------------------------------------------------
/// Derived Segment Text
/// ---------------------------------------------------------------------------

fn effort_text(effort: Effort) -> String {
  match effort {
    Effort::Distance { km } if km < 1.0 => format!("{:.0} m", km * 1000.0),
    Effort::Distance { km } => format!("{km:.1} km"),
    Effort::Duration { min } => format!("{min:.0} min"),
  }
}

/// Render the four named segments from the numeric descriptor.
pub fn render_segments(structure: &WorkoutStructure, paces: &PaceSet) -> Vec<Segment> {
  let easy = format_pace(paces.easy_low);
  let work = format_pace(paces.get(structure.zone));

  let mut segments = vec![Segment {
    name: SegmentName::WarmUp,
    instruction: format!("{:.0} min jog @ {easy}", structure.warmup_min),
  }];

  let main = if structure.reps > 1 {
    format!(
      "{} x {} @ {work}",
      structure.reps,
      effort_text(structure.rep)
    )
  } else {
    format!("{} continuous @ {work}", effort_text(structure.rep))
  };
  segments.push(Segment {
    name: SegmentName::MainSet,
    instruction: main,
  });

  if structure.reps > 1 {
    if let Some(recovery) = structure.recovery {
      segments.push(Segment {
        name: SegmentName::Recovery,
        instruction: format!("{} jog between reps", effort_text(recovery)),
      });
    }
  }

  segments.push(Segment {
    name: SegmentName::CoolDown,
    instruction: format!("{:.0} min jog @ {easy}", structure.cooldown_min),
  });

  segments
}

/// ---------------------------------------------------------------------------
/// Distance Estimation
/// ---------------------------------------------------------------------------

fn km_for_minutes(minutes: f64, pace_s_per_km: Option<f64>) -> f64 {
  let pace = match pace_s_per_km {
    Some(p) if p > 0.0 => p,
    _ => FALLBACK_PACE_S_PER_KM,
  };
  minutes * 60.0 / pace
}

/// Estimate a session's distance from its structured descriptor.
///
/// Warm-up and cool-down convert via the easy pace, the main set via its
/// own zone pace, recoveries via the steady pace. A recovery whose pace is
/// not computable falls back to the configured per-recovery distance. The
/// result never drops under the 1 km display floor.
pub fn estimate_distance(
  structure: &WorkoutStructure,
  paces: &PaceSet,
  config: &PlanConfig,
) -> f64 {
  let mut km = km_for_minutes(structure.warmup_min, paces.easy_low)
    + km_for_minutes(structure.cooldown_min, paces.easy_low);

  km += match structure.rep {
    Effort::Distance { km: rep_km } => f64::from(structure.reps) * rep_km,
    Effort::Duration { min } => {
      f64::from(structure.reps) * km_for_minutes(min, paces.get(structure.zone))
    }
  };

  let recoveries = structure.reps.saturating_sub(1);
  if recoveries > 0 {
    km += f64::from(recoveries)
      * match structure.recovery {
        Some(Effort::Distance { km: rec_km }) => rec_km,
        Some(Effort::Duration { min }) => match paces.easy_high {
          Some(pace) if pace > 0.0 => min * 60.0 / pace,
          _ => config.recovery_fallback_km,
        },
        None => 0.0,
      };
  }

  round_km(km.max(MIN_SESSION_KM))
}

pub fn round_km(km: f64) -> f64 {
  (km * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
