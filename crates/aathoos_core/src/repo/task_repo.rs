//! Task store.
//!
//! # Invariants
//! - `list_all` is creation order ascending.
//! - `list_incomplete` never returns completed tasks; it orders by due date
//!   ascending with undated tasks last, then priority High to Low.
//! - `set_completed` to the current value leaves the row untouched.
//! - `updated_at` never runs ahead of the clock and never moves backwards.

use super::{
    bool_to_int, execute, parse_bool_column, parse_id_column, query_list, query_optional,
    RepoError, RepoResult,
};
use crate::codec::{optional_text, required_text};
use crate::db::Database;
use crate::model::task::{NewTask, Priority, Task};
use crate::model::{now_epoch_secs, RecordId};
use log::{debug, info};
use rusqlite::{params, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    notes,
    due_date,
    priority,
    is_completed,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for task operations.
pub trait TaskRepository {
    fn create(&self, input: &NewTask) -> RepoResult<Task>;
    fn get(&self, id: RecordId) -> RepoResult<Option<Task>>;
    fn list_all(&self) -> RepoResult<Vec<Task>>;
    fn list_incomplete(&self) -> RepoResult<Vec<Task>>;
    fn set_completed(&self, id: RecordId, completed: bool) -> RepoResult<()>;
    fn update_title(&self, id: RecordId, title: &str) -> RepoResult<()>;
    /// Returns whether a row was actually removed.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteTaskRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, input: &NewTask) -> RepoResult<Task> {
        let title = required_text("title", &input.title)?;
        let now = now_epoch_secs();
        let task = Task {
            id: Uuid::new_v4(),
            title,
            notes: optional_text(input.notes.as_deref()),
            due_date: input.due_date,
            priority: input.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.db.with_conn(|conn| {
            execute(
                conn,
                "INSERT INTO tasks (
                    id,
                    title,
                    notes,
                    due_date,
                    priority,
                    is_completed,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    task.id.to_string(),
                    task.title.as_str(),
                    task.notes.as_deref(),
                    task.due_date,
                    task.priority.ordinal(),
                    bool_to_int(task.completed),
                    task.created_at,
                    task.updated_at,
                ],
            )
        })?;

        info!(
            "event=task_create module=task status=ok id={} priority={}",
            task.id,
            task.priority.ordinal()
        );
        Ok(task)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Task>> {
        self.db.with_conn(|conn| {
            query_optional(
                conn,
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                parse_task_row,
            )
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Task>> {
        let tasks = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!("{TASK_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"),
                [],
                parse_task_row,
            )
        })?;
        debug!("event=task_list module=task status=ok count={}", tasks.len());
        Ok(tasks)
    }

    fn list_incomplete(&self) -> RepoResult<Vec<Task>> {
        let tasks = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!(
                    "{TASK_SELECT_SQL}
                     WHERE is_completed = 0
                     ORDER BY
                        due_date IS NULL ASC,
                        due_date ASC,
                        priority DESC,
                        created_at ASC,
                        rowid ASC;"
                ),
                [],
                parse_task_row,
            )
        })?;
        debug!(
            "event=task_list_incomplete module=task status=ok count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn set_completed(&self, id: RecordId, completed: bool) -> RepoResult<()> {
        let changed = self.db.with_conn(|conn| {
            execute(
                conn,
                "UPDATE tasks
                 SET
                    is_completed = ?2,
                    updated_at = CASE
                        WHEN is_completed = ?2 THEN updated_at
                        ELSE MAX(?3, updated_at)
                    END
                 WHERE id = ?1;",
                params![id.to_string(), bool_to_int(completed), now_epoch_secs()],
            )
        })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=task_set_completed module=task status=ok id={id} completed={completed}");
        Ok(())
    }

    fn update_title(&self, id: RecordId, title: &str) -> RepoResult<()> {
        let title = required_text("title", title)?;
        let changed = self.db.with_conn(|conn| {
            execute(
                conn,
                "UPDATE tasks
                 SET
                    title = ?2,
                    updated_at = MAX(?3, updated_at)
                 WHERE id = ?1;",
                params![id.to_string(), title, now_epoch_secs()],
            )
        })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=task_update_title module=task status=ok id={id}");
        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self.db.with_conn(|conn| {
            execute(conn, "DELETE FROM tasks WHERE id = ?1;", [id.to_string()])
        })?;
        info!(
            "event=task_delete module=task status=ok id={id} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = parse_id_column("tasks", &id_text)?;

    let priority_value: i64 = row.get("priority")?;
    let priority = Priority::try_from(priority_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_value}` in tasks.priority"
        ))
    })?;

    let title: String = row.get("title")?;
    if title.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title for task {id} in tasks.title"
        )));
    }

    Ok(Task {
        id,
        title,
        notes: row.get("notes")?,
        due_date: row.get("due_date")?,
        priority,
        completed: parse_bool_column("tasks", "is_completed", row.get("is_completed")?)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
