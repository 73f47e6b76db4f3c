//! Plan document export/import
//!
//! The core owns the round-trippable representation; the file dialogs and
//! actual disk I/O live with the external collaborators. Dates, days and
//! distances must survive an export/import cycle verbatim.

use serde::{Deserialize, Serialize};

use crate::models::TrainingPlan;

/// Bumped when the document layout changes shape.
const FORMAT_VERSION: u32 = 1;

/// Serialized plan plus the request it was generated from (the request
/// travels inside `TrainingPlan`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
  pub version: u32,
  pub plan: TrainingPlan,
}

impl PlanDocument {
  pub fn new(plan: TrainingPlan) -> Self {
    Self {
      version: FORMAT_VERSION,
      plan,
    }
  }

  pub fn to_json(&self) -> Result<String, String> {
    serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize plan: {}", e))
  }

  pub fn from_json(json: &str) -> Result<Self, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse plan document: {}", e))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
