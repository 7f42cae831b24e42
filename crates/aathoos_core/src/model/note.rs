//! Note record.
//!
//! `updated_at >= created_at`, and every body replacement moves it forward.

use super::RecordId;
use serde::{Deserialize, Serialize};

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    /// Free-text grouping key shared with study sessions.
    pub subject: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `NoteRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub subject: Option<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
