//! Study session record.
//!
//! A session is recorded once it has ended: `started_at` is derived as
//! `created_at - duration_secs`, and neither value changes afterwards.

use super::RecordId;
use serde::{Deserialize, Serialize};

/// Persisted study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: RecordId,
    pub subject: String,
    pub duration_secs: i64,
    pub notes: Option<String>,
    pub started_at: i64,
    pub created_at: i64,
}

/// Input for `StudySessionRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudySession {
    pub subject: String,
    pub duration_secs: i64,
    pub notes: Option<String>,
}

impl NewStudySession {
    pub fn new(subject: impl Into<String>, duration_secs: i64) -> Self {
        Self {
            subject: subject.into(),
            duration_secs,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Start time for a session that ends at `ended_at`.
pub fn derive_started_at(ended_at: i64, duration_secs: i64) -> i64 {
    ended_at.saturating_sub(duration_secs)
}
