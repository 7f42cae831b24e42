//! Task record.
//!
//! # Invariants
//! - `title` is never empty.
//! - `priority` is exactly one of three ordinals and encodes as `0|1|2`.

use super::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};

/// Task urgency. Ordering follows the ordinal: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn ordinal(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        value.ordinal()
    }
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(ValidationError::InvalidPriority(other)),
        }
    }
}

/// Persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub notes: Option<String>,
    /// Epoch seconds; `None` sorts after every dated task.
    pub due_date: Option<i64>,
    pub priority: Priority,
    #[serde(rename = "is_completed")]
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `TaskRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<i64>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            notes: None,
            due_date: None,
            priority,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
