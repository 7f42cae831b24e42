//! Domain records for the four persisted entity kinds.
//!
//! # Responsibility
//! - Define the value types materialized by every store read.
//! - Hold per-entity invariants (title presence, priority range, progress
//!   clamping) independent of SQL.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId` assigned at creation.
//! - Records are plain values; none keeps a reference back into storage.
//! - Timestamps are seconds since the Unix epoch.

pub mod goal;
pub mod note;
pub mod study_session;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier shared by all entity kinds.
pub type RecordId = Uuid;

/// Parses a textual record id. Returns `None` for anything that is not a UUID,
/// which can never match a stored row.
pub fn parse_record_id(value: &str) -> Option<RecordId> {
    Uuid::parse_str(value.trim()).ok()
}

/// Current wall clock in epoch seconds.
///
/// Falls back to `0` if the clock sits before 1970 rather than failing a write.
pub fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Rejected input, detected before any write reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Priority ordinal outside `0..=2`.
    InvalidPriority(i64),
    /// Study durations cannot be negative.
    NegativeDuration(i64),
    /// Progress must be a finite number before clamping.
    NonFiniteProgress,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::InvalidPriority(value) => {
                write!(f, "priority must be 0, 1 or 2, got {value}")
            }
            Self::NegativeDuration(value) => {
                write!(f, "duration_secs must be >= 0, got {value}")
            }
            Self::NonFiniteProgress => write!(f, "progress must be a finite number"),
        }
    }
}

impl Error for ValidationError {}
