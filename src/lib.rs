//! Training plan generation core
//!
//! Turns a runner's profile (fitness, race goal, available days, current
//! mileage) into a dated multi-week training calendar. Pure synchronous
//! computation: no I/O, no shared state, configuration passed explicitly.
//!
//! The pipeline: periodization fixes the weekly mileage envelope, the
//! session generator fills each week with concrete workouts, the placement
//! engine assigns them to days under recovery and fatigue rules, and the
//! load accountant and schedule validator report on the result.

pub mod config;
pub mod error;
pub mod export;
pub mod fatigue;
pub mod generator;
pub mod library;
pub mod load;
pub mod models;
pub mod pace;
pub mod periodization;
pub mod placement;
pub mod planner;
pub mod validator;

#[cfg(test)]
mod test_utils;

pub use config::PlanConfig;
pub use error::PlanError;
pub use export::PlanDocument;
pub use models::{
  PerformanceInput, PlanRequest, RunnerLevel, Session, TrainingPlan, Week, Weekday,
};
pub use pace::PaceSet;
pub use planner::generate_plan;
pub use validator::{audit_week, validate_plan, ScheduleReport};
