//! Goal record and progress rules.
//!
//! # Invariants
//! - `progress` is always within `[0.0, 1.0]`.
//! - `completed` is true exactly when `progress == 1.0`; lowering progress
//!   below `1.0` reverts it to false.

use super::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};

pub const PROGRESS_MIN: f64 = 0.0;
pub const PROGRESS_MAX: f64 = 1.0;

/// Persisted goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<i64>,
    pub progress: f64,
    #[serde(rename = "is_completed")]
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `GoalRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<i64>,
}

impl NewGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            target_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_target_date(mut self, target_date: i64) -> Self {
        self.target_date = Some(target_date);
        self
    }
}

/// Progress after clamping, paired with the completion flag it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedProgress {
    pub progress: f64,
    pub completed: bool,
}

/// Clamps raw progress input into `[0.0, 1.0]` and derives `completed`.
///
/// Out-of-range values are clamped, not rejected. NaN and infinities are
/// rejected since they have no meaningful clamp.
pub fn clamp_progress(raw: f64) -> Result<ClampedProgress, ValidationError> {
    if !raw.is_finite() {
        return Err(ValidationError::NonFiniteProgress);
    }
    let progress = raw.clamp(PROGRESS_MIN, PROGRESS_MAX);
    Ok(ClampedProgress {
        progress,
        completed: progress >= PROGRESS_MAX,
    })
}
