//! Study session store.
//!
//! # Invariants
//! - Sessions are append-only apart from delete; `duration_secs` never changes.
//! - Lists are ordered by `started_at` ascending.
//! - `total_duration` is a plain sum over one subject and is `0` when nothing
//!   matches.

use super::{execute, parse_id_column, query_list, query_optional, RepoError, RepoResult};
use crate::codec::{optional_text, required_text};
use crate::db::Database;
use crate::model::study_session::{derive_started_at, NewStudySession, StudySession};
use crate::model::{now_epoch_secs, RecordId, ValidationError};
use log::{debug, info};
use rusqlite::{params, Row};
use uuid::Uuid;

const STUDY_SESSION_SELECT_SQL: &str = "SELECT
    id,
    subject,
    duration_secs,
    notes,
    started_at,
    created_at
FROM study_sessions";

const STUDY_SESSION_ORDER_SQL: &str = "ORDER BY started_at ASC, rowid ASC";

/// Repository interface for study session operations.
pub trait StudySessionRepository {
    fn create(&self, input: &NewStudySession) -> RepoResult<StudySession>;
    fn get(&self, id: RecordId) -> RepoResult<Option<StudySession>>;
    fn list_all(&self) -> RepoResult<Vec<StudySession>>;
    /// Exact subject match, same ordering as `list_all`.
    fn list_by_subject(&self, subject: &str) -> RepoResult<Vec<StudySession>>;
    /// Sum of `duration_secs` over sessions with this subject.
    fn total_duration(&self, subject: &str) -> RepoResult<i64>;
    /// Returns whether a row was actually removed.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed study session repository.
pub struct SqliteStudySessionRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteStudySessionRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl StudySessionRepository for SqliteStudySessionRepository<'_> {
    fn create(&self, input: &NewStudySession) -> RepoResult<StudySession> {
        let subject = required_text("subject", &input.subject)?;
        if input.duration_secs < 0 {
            return Err(ValidationError::NegativeDuration(input.duration_secs).into());
        }

        let now = now_epoch_secs();
        let session = StudySession {
            id: Uuid::new_v4(),
            subject,
            duration_secs: input.duration_secs,
            notes: optional_text(input.notes.as_deref()),
            started_at: derive_started_at(now, input.duration_secs),
            created_at: now,
        };

        self.db.with_conn(|conn| {
            execute(
                conn,
                "INSERT INTO study_sessions (
                    id,
                    subject,
                    duration_secs,
                    notes,
                    started_at,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    session.id.to_string(),
                    session.subject.as_str(),
                    session.duration_secs,
                    session.notes.as_deref(),
                    session.started_at,
                    session.created_at,
                ],
            )
        })?;

        info!(
            "event=study_session_create module=study_session status=ok id={} duration_secs={}",
            session.id, session.duration_secs
        );
        Ok(session)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<StudySession>> {
        self.db.with_conn(|conn| {
            query_optional(
                conn,
                &format!("{STUDY_SESSION_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                parse_study_session_row,
            )
        })
    }

    fn list_all(&self) -> RepoResult<Vec<StudySession>> {
        let sessions = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!("{STUDY_SESSION_SELECT_SQL} {STUDY_SESSION_ORDER_SQL};"),
                [],
                parse_study_session_row,
            )
        })?;
        debug!(
            "event=study_session_list module=study_session status=ok count={}",
            sessions.len()
        );
        Ok(sessions)
    }

    fn list_by_subject(&self, subject: &str) -> RepoResult<Vec<StudySession>> {
        let subject = subject.trim();
        let sessions = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!(
                    "{STUDY_SESSION_SELECT_SQL} WHERE subject = ?1 {STUDY_SESSION_ORDER_SQL};"
                ),
                [subject],
                parse_study_session_row,
            )
        })?;
        debug!(
            "event=study_session_list_by_subject module=study_session status=ok count={}",
            sessions.len()
        );
        Ok(sessions)
    }

    fn total_duration(&self, subject: &str) -> RepoResult<i64> {
        let subject = subject.trim();
        let total = self.db.with_conn(|conn| -> RepoResult<i64> {
            let mut stmt = conn.prepare_cached(
                "SELECT COALESCE(SUM(duration_secs), 0)
                 FROM study_sessions
                 WHERE subject = ?1;",
            )?;
            Ok(stmt.query_row([subject], |row| row.get(0))?)
        })?;
        debug!("event=study_session_total module=study_session status=ok total_secs={total}");
        Ok(total)
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self.db.with_conn(|conn| {
            execute(
                conn,
                "DELETE FROM study_sessions WHERE id = ?1;",
                [id.to_string()],
            )
        })?;
        info!(
            "event=study_session_delete module=study_session status=ok id={id} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn parse_study_session_row(row: &Row<'_>) -> RepoResult<StudySession> {
    let id_text: String = row.get("id")?;
    let id = parse_id_column("study_sessions", &id_text)?;

    let duration_secs: i64 = row.get("duration_secs")?;
    if duration_secs < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative duration {duration_secs} for study session {id}"
        )));
    }

    Ok(StudySession {
        id,
        subject: row.get("subject")?,
        duration_secs,
        notes: row.get("notes")?,
        started_at: row.get("started_at")?,
        created_at: row.get("created_at")?,
    })
}
