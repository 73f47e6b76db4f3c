pub mod plan;
pub mod request;
pub mod weekday;

pub use plan::{
  Effort, Phase, PhaseKind, Segment, SegmentName, Session, SessionKind, TrainingPlan, Week,
  WeekConfig, WorkoutStructure,
};
pub use request::{PerformanceInput, PlanRequest, RunnerLevel};
pub use weekday::Weekday;
