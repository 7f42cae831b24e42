//! Core storage for aathoos: tasks, notes, goals and study sessions.
//! This crate is the single source of truth for record invariants.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use codec::{encode_list, encode_record, CodecError, CodecResult};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::goal::{Goal, NewGoal};
pub use model::note::{NewNote, Note};
pub use model::study_session::{NewStudySession, StudySession};
pub use model::task::{NewTask, Priority, Task};
pub use model::{parse_record_id, RecordId, ValidationError};
pub use repo::goal_repo::{GoalRepository, SqliteGoalRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::study_session_repo::{SqliteStudySessionRepository, StudySessionRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
