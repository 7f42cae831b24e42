//! Goal store.
//!
//! # Invariants
//! - `list_all` is creation order ascending.
//! - `set_progress` clamps into `[0.0, 1.0]` and writes progress together
//!   with the derived `is_completed` flag in one statement.
//! - Re-setting the stored progress leaves `updated_at` untouched.

use super::{
    bool_to_int, execute, parse_bool_column, parse_id_column, query_list, query_optional,
    RepoError, RepoResult,
};
use crate::codec::{optional_text, required_text};
use crate::db::Database;
use crate::model::goal::{clamp_progress, Goal, NewGoal, PROGRESS_MAX, PROGRESS_MIN};
use crate::model::{now_epoch_secs, RecordId};
use log::{debug, info};
use rusqlite::{params, Row};
use uuid::Uuid;

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    target_date,
    progress,
    is_completed,
    created_at,
    updated_at
FROM goals";

/// Repository interface for goal operations.
pub trait GoalRepository {
    fn create(&self, input: &NewGoal) -> RepoResult<Goal>;
    fn get(&self, id: RecordId) -> RepoResult<Option<Goal>>;
    fn list_all(&self) -> RepoResult<Vec<Goal>>;
    /// Clamps `progress` and derives completion; see `clamp_progress`.
    fn set_progress(&self, id: RecordId, progress: f64) -> RepoResult<()>;
    /// Returns whether a row was actually removed.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteGoalRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create(&self, input: &NewGoal) -> RepoResult<Goal> {
        let title = required_text("title", &input.title)?;
        let now = now_epoch_secs();
        let goal = Goal {
            id: Uuid::new_v4(),
            title,
            description: optional_text(input.description.as_deref()),
            target_date: input.target_date,
            progress: PROGRESS_MIN,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.db.with_conn(|conn| {
            execute(
                conn,
                "INSERT INTO goals (
                    id,
                    title,
                    description,
                    target_date,
                    progress,
                    is_completed,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    goal.id.to_string(),
                    goal.title.as_str(),
                    goal.description.as_deref(),
                    goal.target_date,
                    goal.progress,
                    bool_to_int(goal.completed),
                    goal.created_at,
                    goal.updated_at,
                ],
            )
        })?;

        info!("event=goal_create module=goal status=ok id={}", goal.id);
        Ok(goal)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Goal>> {
        self.db.with_conn(|conn| {
            query_optional(
                conn,
                &format!("{GOAL_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                parse_goal_row,
            )
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Goal>> {
        let goals = self.db.with_conn(|conn| {
            query_list(
                conn,
                &format!("{GOAL_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"),
                [],
                parse_goal_row,
            )
        })?;
        debug!("event=goal_list module=goal status=ok count={}", goals.len());
        Ok(goals)
    }

    fn set_progress(&self, id: RecordId, progress: f64) -> RepoResult<()> {
        let clamped = clamp_progress(progress)?;
        let changed = self.db.with_conn(|conn| {
            execute(
                conn,
                "UPDATE goals
                 SET
                    progress = ?2,
                    is_completed = ?3,
                    updated_at = CASE
                        WHEN progress = ?2 THEN updated_at
                        ELSE MAX(?4, updated_at)
                    END
                 WHERE id = ?1;",
                params![
                    id.to_string(),
                    clamped.progress,
                    bool_to_int(clamped.completed),
                    now_epoch_secs(),
                ],
            )
        })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!(
            "event=goal_set_progress module=goal status=ok id={id} progress={} completed={}",
            clamped.progress, clamped.completed
        );
        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self.db.with_conn(|conn| {
            execute(conn, "DELETE FROM goals WHERE id = ?1;", [id.to_string()])
        })?;
        info!(
            "event=goal_delete module=goal status=ok id={id} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let id = parse_id_column("goals", &id_text)?;

    let progress: f64 = row.get("progress")?;
    if !(PROGRESS_MIN..=PROGRESS_MAX).contains(&progress) {
        return Err(RepoError::InvalidData(format!(
            "progress {progress} out of range for goal {id}"
        )));
    }

    let completed = parse_bool_column("goals", "is_completed", row.get("is_completed")?)?;
    if completed != (progress >= PROGRESS_MAX) {
        return Err(RepoError::InvalidData(format!(
            "goal {id} has is_completed={completed} with progress {progress}"
        )));
    }

    Ok(Goal {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        target_date: row.get("target_date")?,
        progress,
        completed,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
