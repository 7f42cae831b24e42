//! Note store.
//!
//! # Invariants
//! - `updated_at` never runs ahead of the clock and never moves backwards.
//! - `revision` is a table-wide sequence bumped by every create and body
//!   update, so the most recently touched note has the highest revision.
//! - Lists are ordered by `updated_at DESC, revision DESC`.

use super::{execute, parse_id_column, query_list, query_optional, RepoError, RepoResult};
use crate::codec::{optional_text, required_text};
use crate::db::Database;
use crate::model::note::{NewNote, Note};
use crate::model::{now_epoch_secs, RecordId};
use log::{debug, info};
use rusqlite::{params, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    subject,
    created_at,
    updated_at
FROM notes";

const NOTE_ORDER_SQL: &str = "ORDER BY updated_at DESC, revision DESC";

const NEXT_REVISION_SQL: &str = "(SELECT COALESCE(MAX(revision), 0) + 1 FROM notes)";

/// Repository interface for note operations.
pub trait NoteRepository {
    fn create(&self, input: &NewNote) -> RepoResult<Note>;
    fn get(&self, id: RecordId) -> RepoResult<Option<Note>>;
    fn list_all(&self) -> RepoResult<Vec<Note>>;
    /// Exact subject match, same ordering as `list_all`.
    fn list_by_subject(&self, subject: &str) -> RepoResult<Vec<Note>>;
    fn update_body(&self, id: RecordId, body: &str) -> RepoResult<()>;
    /// Returns whether a row was actually removed.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteNoteRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&self, input: &NewNote) -> RepoResult<Note> {
        let title = required_text("title", &input.title)?;
        let now = now_epoch_secs();
        let note = Note {
            id: Uuid::new_v4(),
            title,
            body: input.body.clone(),
            subject: optional_text(input.subject.as_deref()),
            created_at: now,
            updated_at: now,
        };

        self.db.with_conn(|conn| {
            execute(
                conn,
                &format!(
                    "INSERT INTO notes (
                        id,
                        title,
                        body,
                        subject,
                        created_at,
                        updated_at,
                        revision
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, {NEXT_REVISION_SQL});"
                ),
                params![
                    note.id.to_string(),
                    note.title.as_str(),
                    note.body.as_str(),
                    note.subject.as_deref(),
                    note.created_at,
                    note.updated_at,
                ],
            )
        })?;

        info!(
            "event=note_create module=note status=ok id={} has_subject={}",
            note.id,
            note.subject.is_some()
        );
        Ok(note)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Note>> {
        self.db.with_conn(|conn| {
            query_optional(
                conn,
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                parse_note_row,
            )
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Note>> {
        let notes = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!("{NOTE_SELECT_SQL} {NOTE_ORDER_SQL};"),
                [],
                parse_note_row,
            )
        })?;
        debug!("event=note_list module=note status=ok count={}", notes.len());
        Ok(notes)
    }

    fn list_by_subject(&self, subject: &str) -> RepoResult<Vec<Note>> {
        let subject = subject.trim();
        let notes = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!("{NOTE_SELECT_SQL} WHERE subject = ?1 {NOTE_ORDER_SQL};"),
                [subject],
                parse_note_row,
            )
        })?;
        debug!(
            "event=note_list_by_subject module=note status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn update_body(&self, id: RecordId, body: &str) -> RepoResult<()> {
        let changed = self.db.with_conn(|conn| {
            execute(
                conn,
                &format!(
                    "UPDATE notes
                     SET
                        body = ?2,
                        updated_at = MAX(?3, updated_at),
                        revision = {NEXT_REVISION_SQL}
                     WHERE id = ?1;"
                ),
                params![id.to_string(), body, now_epoch_secs()],
            )
        })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=note_update_body module=note status=ok id={id}");
        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self.db.with_conn(|conn| {
            execute(conn, "DELETE FROM notes WHERE id = ?1;", [id.to_string()])
        })?;
        info!(
            "event=note_delete module=note status=ok id={id} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = parse_id_column("notes", &id_text)?;

    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;
    if updated_at < created_at {
        return Err(RepoError::InvalidData(format!(
            "note {id} has updated_at {updated_at} before created_at {created_at}"
        )));
    }

    Ok(Note {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        subject: row.get("subject")?,
        created_at,
        updated_at,
    })
}
