//! C ABI for Swift (macOS) and C# P/Invoke (Windows) hosts.
//!
//! # Responsibility
//! - Translate primitive C arguments into core store calls.
//! - Hand encoded records to the host as owned C strings.
//!
//! # FFI contract
//! - Functions returning data return a JSON `char*`, or NULL on any failure.
//!   The host releases it with `aathoos_free_string` and nothing else.
//! - Mutations return `bool` (`true` = success).
//! - `aathoos_study_session_total_duration` returns `-1` on failure.
//! - Not-found, validation and storage failures all collapse to the same
//!   sentinel; the reason is logged.
//! - A handle is valid from `aathoos_db_open` until `aathoos_db_close`.
//!   Closed or unknown handles are detected and yield the sentinel.
//! - No call panics across the boundary.

use crate::handles::{self, AathoosDb};
use aathoos_core::{
    core_version, encode_list, encode_record, init_logging, parse_record_id, CodecError,
    Database, DbError, GoalRepository, NewGoal, NewNote, NewStudySession, NewTask, NoteRepository,
    Priority, RecordId, RepoError, SqliteGoalRepository, SqliteNoteRepository,
    SqliteStudySessionRepository, SqliteTaskRepository, StudySessionRepository, TaskRepository,
};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::fmt::{Display, Formatter};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

/// Why a boundary call returned its sentinel. Logged, never returned.
#[derive(Debug)]
enum BoundaryError {
    NotFound,
    InvalidHandle,
    InvalidArgument(String),
    Db(DbError),
    Repo(RepoError),
    Codec(CodecError),
}

impl Display for BoundaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "record not found"),
            Self::InvalidHandle => write!(f, "database handle is closed or unknown"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl From<RepoError> for BoundaryError {
    fn from(value: RepoError) -> Self {
        if value.is_not_found() {
            Self::NotFound
        } else {
            Self::Repo(value)
        }
    }
}

impl From<DbError> for BoundaryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CodecError> for BoundaryError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

type BoundaryResult<T> = Result<T, BoundaryError>;

/// Runs `body`, collapsing errors and panics into `fallback`.
fn guarded<T>(op: &'static str, fallback: T, body: impl FnOnce() -> BoundaryResult<T>) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(BoundaryError::NotFound)) => {
            debug!("event={op} module=ffi status=not_found");
            fallback
        }
        Ok(Err(err)) => {
            warn!("event={op} module=ffi status=error error={err}");
            fallback
        }
        Err(_) => {
            error!("event={op} module=ffi status=panic");
            fallback
        }
    }
}

fn with_db<T>(db: *mut AathoosDb, f: impl FnOnce(&Database) -> BoundaryResult<T>) -> BoundaryResult<T> {
    let handle = handles::resolve(db).ok_or(BoundaryError::InvalidHandle)?;
    f(&*handle)
}

/// Borrows an optional UTF-8 string. NULL maps to `None`.
///
/// # Safety
/// `ptr` must be NULL or a NUL-terminated string valid for the call.
unsafe fn optional_arg<'a>(field: &str, ptr: *const c_char) -> BoundaryResult<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let value = unsafe { CStr::from_ptr(ptr) };
    value
        .to_str()
        .map(Some)
        .map_err(|_| BoundaryError::InvalidArgument(format!("`{field}` is not valid UTF-8")))
}

/// Borrows a required UTF-8 string. NULL is an invalid argument.
///
/// # Safety
/// Same as `optional_arg`.
unsafe fn required_arg<'a>(field: &str, ptr: *const c_char) -> BoundaryResult<&'a str> {
    let value = unsafe { optional_arg(field, ptr) }?;
    value.ok_or_else(|| BoundaryError::InvalidArgument(format!("`{field}` must not be NULL")))
}

/// Parses a record id argument. Text that is not an id can match no record.
///
/// # Safety
/// Same as `optional_arg`.
unsafe fn id_arg(ptr: *const c_char) -> BoundaryResult<RecordId> {
    let text = unsafe { required_arg("id", ptr) }?;
    parse_record_id(text).ok_or(BoundaryError::NotFound)
}

/// `0` is the boundary spelling of "no date".
fn optional_date(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

fn into_c_string(text: String) -> BoundaryResult<*mut c_char> {
    let owned = CString::new(text).map_err(CodecError::from)?;
    Ok(owned.into_raw())
}

fn record_out<T: Serialize>(record: &T) -> BoundaryResult<*mut c_char> {
    into_c_string(encode_record(record)?)
}

fn list_out<T: Serialize>(records: &[T]) -> BoundaryResult<*mut c_char> {
    into_c_string(encode_list(records)?)
}

fn found<T>(record: Option<T>) -> BoundaryResult<T> {
    record.ok_or(BoundaryError::NotFound)
}

// Lifecycle

/// Opens (or creates) a SQLite database at `path`.
/// Returns an opaque handle, or NULL on failure.
#[no_mangle]
pub extern "C" fn aathoos_db_open(path: *const c_char) -> *mut AathoosDb {
    guarded("db_open", ptr::null_mut(), || {
        let path = unsafe { required_arg("path", path) }?;
        let db = Database::open(path)?;
        Ok(handles::register(db))
    })
}

/// Closes a handle from `aathoos_db_open`. NULL is a no-op; closing twice
/// is detected and logged.
#[no_mangle]
pub extern "C" fn aathoos_db_close(db: *mut AathoosDb) {
    if db.is_null() {
        return;
    }
    guarded("db_close", (), || {
        let handle = handles::release(db).ok_or(BoundaryError::InvalidHandle)?;
        match std::sync::Arc::try_unwrap(handle) {
            Ok(database) => Ok(database.close()?),
            Err(_in_flight) => {
                info!("event=db_close module=ffi status=deferred");
                Ok(())
            }
        }
    })
}

/// Frees a string returned by any function in this library. NULL is a no-op.
#[no_mangle]
pub extern "C" fn aathoos_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        // SAFETY: the host only passes pointers produced by `CString::into_raw`
        // in this library, each exactly once.
        unsafe { drop(CString::from_raw(ptr)) };
    }
}

/// Returns the core version string. Free with `aathoos_free_string`.
#[no_mangle]
pub extern "C" fn aathoos_core_version() -> *mut c_char {
    guarded("core_version", ptr::null_mut(), || {
        into_c_string(core_version().to_string())
    })
}

/// Starts rolling file logs. Returns NULL on success, otherwise an error
/// message to free with `aathoos_free_string`.
#[no_mangle]
pub extern "C" fn aathoos_init_logging(level: *const c_char, log_dir: *const c_char) -> *mut c_char {
    let message = guarded("init_logging", Some("logging init failed".to_string()), || {
        let level = unsafe { required_arg("level", level) }?;
        let log_dir = unsafe { required_arg("log_dir", log_dir) }?;
        Ok(init_logging(level, log_dir).err())
    });
    match message {
        Some(text) => into_c_string(text).unwrap_or(ptr::null_mut()),
        None => ptr::null_mut(),
    }
}

// Tasks

/// Creates a task. `notes` may be NULL; `due_date = 0` means none;
/// `priority`: 0 = Low, 1 = Medium, 2 = High. Returns a JSON Task or NULL.
#[no_mangle]
pub extern "C" fn aathoos_task_create(
    db: *mut AathoosDb,
    title: *const c_char,
    notes: *const c_char,
    due_date: i64,
    priority: i32,
) -> *mut c_char {
    guarded("task_create", ptr::null_mut(), || {
        let title = unsafe { required_arg("title", title) }?;
        let notes = unsafe { optional_arg("notes", notes) }?;
        let priority = Priority::try_from(i64::from(priority)).map_err(RepoError::from)?;
        let input = NewTask {
            title: title.to_string(),
            notes: notes.map(str::to_string),
            due_date: optional_date(due_date),
            priority,
        };
        with_db(db, |db| record_out(&SqliteTaskRepository::new(db).create(&input)?))
    })
}

/// Returns the JSON Task with this id, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_task_get(db: *mut AathoosDb, id: *const c_char) -> *mut c_char {
    guarded("task_get", ptr::null_mut(), || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| record_out(&found(SqliteTaskRepository::new(db).get(id)?)?))
    })
}

/// Returns a JSON array of all tasks in creation order, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_task_list_all(db: *mut AathoosDb) -> *mut c_char {
    guarded("task_list_all", ptr::null_mut(), || {
        with_db(db, |db| list_out(&SqliteTaskRepository::new(db).list_all()?))
    })
}

/// Returns a JSON array of incomplete tasks by due date, then priority, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_task_list_incomplete(db: *mut AathoosDb) -> *mut c_char {
    guarded("task_list_incomplete", ptr::null_mut(), || {
        with_db(db, |db| {
            list_out(&SqliteTaskRepository::new(db).list_incomplete()?)
        })
    })
}

/// Marks a task complete or incomplete. Idempotent.
#[no_mangle]
pub extern "C" fn aathoos_task_set_completed(
    db: *mut AathoosDb,
    id: *const c_char,
    completed: bool,
) -> bool {
    guarded("task_set_completed", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| {
            SqliteTaskRepository::new(db).set_completed(id, completed)?;
            Ok(true)
        })
    })
}

/// Replaces a task's title. An empty title fails.
#[no_mangle]
pub extern "C" fn aathoos_task_update_title(
    db: *mut AathoosDb,
    id: *const c_char,
    title: *const c_char,
) -> bool {
    guarded("task_update_title", false, || {
        let id = unsafe { id_arg(id) }?;
        let title = unsafe { optional_arg("title", title) }?.unwrap_or_default();
        with_db(db, |db| {
            SqliteTaskRepository::new(db).update_title(id, title)?;
            Ok(true)
        })
    })
}

/// Deletes a task. Returns true only if a row was removed.
#[no_mangle]
pub extern "C" fn aathoos_task_delete(db: *mut AathoosDb, id: *const c_char) -> bool {
    guarded("task_delete", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| Ok(SqliteTaskRepository::new(db).delete(id)?))
    })
}

// Notes

/// Creates a note. NULL `body` is empty; `subject` may be NULL.
/// Returns a JSON Note or NULL.
#[no_mangle]
pub extern "C" fn aathoos_note_create(
    db: *mut AathoosDb,
    title: *const c_char,
    body: *const c_char,
    subject: *const c_char,
) -> *mut c_char {
    guarded("note_create", ptr::null_mut(), || {
        let title = unsafe { required_arg("title", title) }?;
        let body = unsafe { optional_arg("body", body) }?.unwrap_or_default();
        let subject = unsafe { optional_arg("subject", subject) }?;
        let input = NewNote {
            title: title.to_string(),
            body: body.to_string(),
            subject: subject.map(str::to_string),
        };
        with_db(db, |db| record_out(&SqliteNoteRepository::new(db).create(&input)?))
    })
}

/// Returns the JSON Note with this id, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_note_get(db: *mut AathoosDb, id: *const c_char) -> *mut c_char {
    guarded("note_get", ptr::null_mut(), || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| record_out(&found(SqliteNoteRepository::new(db).get(id)?)?))
    })
}

/// Returns a JSON array of all notes, most recently updated first, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_note_list_all(db: *mut AathoosDb) -> *mut c_char {
    guarded("note_list_all", ptr::null_mut(), || {
        with_db(db, |db| list_out(&SqliteNoteRepository::new(db).list_all()?))
    })
}

/// Returns a JSON array of notes with exactly this subject, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_note_list_by_subject(
    db: *mut AathoosDb,
    subject: *const c_char,
) -> *mut c_char {
    guarded("note_list_by_subject", ptr::null_mut(), || {
        let subject = unsafe { required_arg("subject", subject) }?;
        with_db(db, |db| {
            list_out(&SqliteNoteRepository::new(db).list_by_subject(subject)?)
        })
    })
}

/// Replaces a note's body and bumps `updated_at`.
#[no_mangle]
pub extern "C" fn aathoos_note_update_body(
    db: *mut AathoosDb,
    id: *const c_char,
    body: *const c_char,
) -> bool {
    guarded("note_update_body", false, || {
        let id = unsafe { id_arg(id) }?;
        let body = unsafe { optional_arg("body", body) }?.unwrap_or_default();
        with_db(db, |db| {
            SqliteNoteRepository::new(db).update_body(id, body)?;
            Ok(true)
        })
    })
}

/// Deletes a note. Returns true only if a row was removed.
#[no_mangle]
pub extern "C" fn aathoos_note_delete(db: *mut AathoosDb, id: *const c_char) -> bool {
    guarded("note_delete", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| Ok(SqliteNoteRepository::new(db).delete(id)?))
    })
}

// Goals

/// Creates a goal. `description` may be NULL; `target_date = 0` means none.
/// Returns a JSON Goal or NULL.
#[no_mangle]
pub extern "C" fn aathoos_goal_create(
    db: *mut AathoosDb,
    title: *const c_char,
    description: *const c_char,
    target_date: i64,
) -> *mut c_char {
    guarded("goal_create", ptr::null_mut(), || {
        let title = unsafe { required_arg("title", title) }?;
        let description = unsafe { optional_arg("description", description) }?;
        let input = NewGoal {
            title: title.to_string(),
            description: description.map(str::to_string),
            target_date: optional_date(target_date),
        };
        with_db(db, |db| record_out(&SqliteGoalRepository::new(db).create(&input)?))
    })
}

/// Returns the JSON Goal with this id, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_goal_get(db: *mut AathoosDb, id: *const c_char) -> *mut c_char {
    guarded("goal_get", ptr::null_mut(), || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| record_out(&found(SqliteGoalRepository::new(db).get(id)?)?))
    })
}

/// Returns a JSON array of all goals in creation order, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_goal_list_all(db: *mut AathoosDb) -> *mut c_char {
    guarded("goal_list_all", ptr::null_mut(), || {
        with_db(db, |db| list_out(&SqliteGoalRepository::new(db).list_all()?))
    })
}

/// Sets progress, clamped to 0.0..=1.0. Reaching 1.0 completes the goal;
/// dropping below it un-completes it. NaN and infinities fail.
#[no_mangle]
pub extern "C" fn aathoos_goal_set_progress(
    db: *mut AathoosDb,
    id: *const c_char,
    progress: f64,
) -> bool {
    guarded("goal_set_progress", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| {
            SqliteGoalRepository::new(db).set_progress(id, progress)?;
            Ok(true)
        })
    })
}

/// Deletes a goal. Returns true only if a row was removed.
#[no_mangle]
pub extern "C" fn aathoos_goal_delete(db: *mut AathoosDb, id: *const c_char) -> bool {
    guarded("goal_delete", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| Ok(SqliteGoalRepository::new(db).delete(id)?))
    })
}

// Study sessions

/// Records a finished study session. `notes` may be NULL.
/// Returns a JSON StudySession or NULL.
#[no_mangle]
pub extern "C" fn aathoos_study_session_create(
    db: *mut AathoosDb,
    subject: *const c_char,
    duration_secs: i64,
    notes: *const c_char,
) -> *mut c_char {
    guarded("study_session_create", ptr::null_mut(), || {
        let subject = unsafe { required_arg("subject", subject) }?;
        let notes = unsafe { optional_arg("notes", notes) }?;
        let input = NewStudySession {
            subject: subject.to_string(),
            duration_secs,
            notes: notes.map(str::to_string),
        };
        with_db(db, |db| {
            record_out(&SqliteStudySessionRepository::new(db).create(&input)?)
        })
    })
}

/// Returns the JSON StudySession with this id, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_study_session_get(db: *mut AathoosDb, id: *const c_char) -> *mut c_char {
    guarded("study_session_get", ptr::null_mut(), || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| {
            record_out(&found(SqliteStudySessionRepository::new(db).get(id)?)?)
        })
    })
}

/// Returns a JSON array of all sessions by start time, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_study_session_list_all(db: *mut AathoosDb) -> *mut c_char {
    guarded("study_session_list_all", ptr::null_mut(), || {
        with_db(db, |db| {
            list_out(&SqliteStudySessionRepository::new(db).list_all()?)
        })
    })
}

/// Returns a JSON array of sessions with exactly this subject, or NULL.
#[no_mangle]
pub extern "C" fn aathoos_study_session_list_by_subject(
    db: *mut AathoosDb,
    subject: *const c_char,
) -> *mut c_char {
    guarded("study_session_list_by_subject", ptr::null_mut(), || {
        let subject = unsafe { required_arg("subject", subject) }?;
        with_db(db, |db| {
            list_out(&SqliteStudySessionRepository::new(db).list_by_subject(subject)?)
        })
    })
}

/// Total seconds studied for a subject; `0` when none match, `-1` on error.
#[no_mangle]
pub extern "C" fn aathoos_study_session_total_duration(
    db: *mut AathoosDb,
    subject: *const c_char,
) -> i64 {
    guarded("study_session_total_duration", -1, || {
        let subject = unsafe { required_arg("subject", subject) }?;
        with_db(db, |db| {
            Ok(SqliteStudySessionRepository::new(db).total_duration(subject)?)
        })
    })
}

/// Deletes a study session. Returns true only if a row was removed.
#[no_mangle]
pub extern "C" fn aathoos_study_session_delete(db: *mut AathoosDb, id: *const c_char) -> bool {
    guarded("study_session_delete", false, || {
        let id = unsafe { id_arg(id) }?;
        with_db(db, |db| Ok(SqliteStudySessionRepository::new(db).delete(id)?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::ffi::CString;

    fn cstr(value: &str) -> CString {
        CString::new(value).unwrap()
    }

    /// Copies an owned result string and releases it through the library.
    fn take_json(ptr: *mut c_char) -> Option<Value> {
        if ptr.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        aathoos_free_string(ptr);
        Some(serde_json::from_str(&text).unwrap())
    }

    fn open_temp_db() -> (tempfile::TempDir, *mut AathoosDb) {
        let dir = tempfile::tempdir().unwrap();
        let path = cstr(dir.path().join("aathoos.db").to_str().unwrap());
        let db = aathoos_db_open(path.as_ptr());
        assert!(!db.is_null());
        (dir, db)
    }

    fn id_of(value: &Value) -> CString {
        cstr(value["id"].as_str().unwrap())
    }

    #[test]
    fn open_rejects_null_path() {
        assert!(aathoos_db_open(ptr::null()).is_null());
    }

    #[test]
    fn open_rejects_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = cstr(dir.path().join("missing/dir/aathoos.db").to_str().unwrap());
        assert!(aathoos_db_open(path.as_ptr()).is_null());
    }

    #[test]
    fn task_lifecycle_through_boundary() {
        let (_dir, db) = open_temp_db();
        let title = cstr("Finish lab report");

        let created = take_json(aathoos_task_create(db, title.as_ptr(), ptr::null(), 0, 2))
            .expect("task should be created");
        assert_eq!(created["priority"], 2);
        assert!(created["due_date"].is_null());
        assert!(created["notes"].is_null());
        assert_eq!(created["is_completed"], false);

        let id = id_of(&created);
        let fetched = take_json(aathoos_task_get(db, id.as_ptr())).unwrap();
        assert_eq!(fetched, created);

        assert!(aathoos_task_set_completed(db, id.as_ptr(), true));
        assert!(aathoos_task_set_completed(db, id.as_ptr(), true));
        let incomplete = take_json(aathoos_task_list_incomplete(db)).unwrap();
        assert_eq!(incomplete.as_array().unwrap().len(), 0);

        let renamed = cstr("Submit lab report");
        assert!(aathoos_task_update_title(db, id.as_ptr(), renamed.as_ptr()));
        let all = take_json(aathoos_task_list_all(db)).unwrap();
        assert_eq!(all[0]["title"], "Submit lab report");

        assert!(aathoos_task_delete(db, id.as_ptr()));
        assert!(!aathoos_task_delete(db, id.as_ptr()));
        assert!(aathoos_task_get(db, id.as_ptr()).is_null());

        aathoos_db_close(db);
    }

    #[test]
    fn task_create_rejects_bad_input() {
        let (_dir, db) = open_temp_db();
        let empty = cstr("   ");
        let title = cstr("ok");

        assert!(aathoos_task_create(db, empty.as_ptr(), ptr::null(), 0, 1).is_null());
        assert!(aathoos_task_create(db, ptr::null(), ptr::null(), 0, 1).is_null());
        assert!(aathoos_task_create(db, title.as_ptr(), ptr::null(), 0, 3).is_null());
        assert!(aathoos_task_create(db, title.as_ptr(), ptr::null(), 0, -1).is_null());

        aathoos_db_close(db);
    }

    #[test]
    fn update_title_with_empty_or_unknown_id_fails() {
        let (_dir, db) = open_temp_db();
        let title = cstr("Read");
        let created = take_json(aathoos_task_create(db, title.as_ptr(), ptr::null(), 0, 0)).unwrap();
        let id = id_of(&created);

        let empty = cstr("");
        assert!(!aathoos_task_update_title(db, id.as_ptr(), empty.as_ptr()));
        assert!(!aathoos_task_update_title(db, id.as_ptr(), ptr::null()));

        let missing = cstr("00000000-0000-4000-8000-000000000000");
        assert!(!aathoos_task_update_title(db, missing.as_ptr(), title.as_ptr()));
        let garbage = cstr("not-an-id");
        assert!(!aathoos_task_set_completed(db, garbage.as_ptr(), true));
        assert!(aathoos_task_get(db, garbage.as_ptr()).is_null());

        aathoos_db_close(db);
    }

    #[test]
    fn note_flow_through_boundary() {
        let (_dir, db) = open_temp_db();
        let title = cstr("Cell biology");
        let subject = cstr("biology");

        let created = take_json(aathoos_note_create(
            db,
            title.as_ptr(),
            ptr::null(),
            subject.as_ptr(),
        ))
        .unwrap();
        assert_eq!(created["body"], "");
        assert_eq!(created["subject"], "biology");

        let id = id_of(&created);
        let body = cstr("mitochondria");
        assert!(aathoos_note_update_body(db, id.as_ptr(), body.as_ptr()));

        let listed = take_json(aathoos_note_list_by_subject(db, subject.as_ptr())).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["body"], "mitochondria");
        assert!(listed[0]["updated_at"].as_i64() >= created["updated_at"].as_i64());

        let other = cstr("history");
        let none = take_json(aathoos_note_list_by_subject(db, other.as_ptr())).unwrap();
        assert_eq!(none, Value::Array(Vec::new()));

        assert!(aathoos_note_delete(db, id.as_ptr()));
        assert!(aathoos_note_get(db, id.as_ptr()).is_null());
        aathoos_db_close(db);
    }

    #[test]
    fn goal_progress_clamps_through_boundary() {
        let (_dir, db) = open_temp_db();
        let title = cstr("Run a marathon");
        let created = take_json(aathoos_goal_create(db, title.as_ptr(), ptr::null(), 1_800_000_000)).unwrap();
        assert_eq!(created["target_date"], 1_800_000_000i64);
        assert_eq!(created["progress"], 0.0);
        let id = id_of(&created);

        assert!(aathoos_goal_set_progress(db, id.as_ptr(), 1.5));
        let goal = take_json(aathoos_goal_get(db, id.as_ptr())).unwrap();
        assert_eq!(goal["progress"], 1.0);
        assert_eq!(goal["is_completed"], true);

        assert!(!aathoos_goal_set_progress(db, id.as_ptr(), f64::NAN));
        assert!(aathoos_goal_set_progress(db, id.as_ptr(), -0.2));
        let goal = take_json(aathoos_goal_get(db, id.as_ptr())).unwrap();
        assert_eq!(goal["progress"], 0.0);
        assert_eq!(goal["is_completed"], false);

        let goals = take_json(aathoos_goal_list_all(db)).unwrap();
        assert_eq!(goals.as_array().unwrap().len(), 1);
        assert!(aathoos_goal_delete(db, id.as_ptr()));
        aathoos_db_close(db);
    }

    #[test]
    fn study_session_totals_through_boundary() {
        let (_dir, db) = open_temp_db();
        let math = cstr("math");
        let science = cstr("science");

        for (subject, secs) in [(&math, 60), (&math, 90), (&science, 30)] {
            assert!(!aathoos_study_session_create(db, subject.as_ptr(), secs, ptr::null()).is_null());
        }
        assert!(aathoos_study_session_create(db, math.as_ptr(), -5, ptr::null()).is_null());

        assert_eq!(aathoos_study_session_total_duration(db, math.as_ptr()), 150);
        let art = cstr("art");
        assert_eq!(aathoos_study_session_total_duration(db, art.as_ptr()), 0);
        assert_eq!(aathoos_study_session_total_duration(db, ptr::null()), -1);

        let sessions = take_json(aathoos_study_session_list_by_subject(db, math.as_ptr())).unwrap();
        assert_eq!(sessions.as_array().unwrap().len(), 2);
        let all = take_json(aathoos_study_session_list_all(db)).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 3);

        let id = id_of(&sessions[0]);
        let fetched = take_json(aathoos_study_session_get(db, id.as_ptr())).unwrap();
        assert_eq!(fetched, sessions[0]);
        assert!(aathoos_study_session_delete(db, id.as_ptr()));
        assert_eq!(aathoos_study_session_total_duration(db, math.as_ptr()), 90);

        aathoos_db_close(db);
    }

    #[test]
    fn closed_handle_is_detected() {
        let (_dir, db) = open_temp_db();
        let title = cstr("after close");
        aathoos_db_close(db);

        assert!(aathoos_task_list_all(db).is_null());
        assert!(aathoos_task_create(db, title.as_ptr(), ptr::null(), 0, 1).is_null());
        assert_eq!(aathoos_study_session_total_duration(db, title.as_ptr()), -1);
        aathoos_db_close(db);
    }

    #[test]
    fn null_handle_yields_sentinels() {
        let id = cstr("00000000-0000-4000-8000-000000000000");
        assert!(aathoos_task_list_all(ptr::null_mut()).is_null());
        assert!(!aathoos_goal_delete(ptr::null_mut(), id.as_ptr()));
        aathoos_db_close(ptr::null_mut());
        aathoos_free_string(ptr::null_mut());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = cstr(dir.path().join("aathoos.db").to_str().unwrap());
        let title = cstr("persisted");

        let db = aathoos_db_open(path.as_ptr());
        let created = take_json(aathoos_goal_create(db, title.as_ptr(), ptr::null(), 0)).unwrap();
        aathoos_db_close(db);

        let db = aathoos_db_open(path.as_ptr());
        let id = id_of(&created);
        let fetched = take_json(aathoos_goal_get(db, id.as_ptr())).unwrap();
        assert_eq!(fetched, created);
        aathoos_db_close(db);
    }

    #[test]
    fn output_with_interior_nul_is_a_codec_failure() {
        let err = into_c_string("left\0right".to_string()).unwrap_err();
        assert!(matches!(err, BoundaryError::Codec(CodecError::InteriorNul(_))));
    }

    #[test]
    fn version_is_exposed_as_owned_string() {
        let ptr = aathoos_core_version();
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        aathoos_free_string(ptr);
        assert_eq!(text, core_version());
    }

    #[test]
    fn init_logging_reports_invalid_arguments() {
        let level = cstr("verbose");
        let dir = cstr("relative/logs");
        let message = aathoos_init_logging(level.as_ptr(), dir.as_ptr());
        assert!(!message.is_null());
        let text = unsafe { CStr::from_ptr(message) }.to_str().unwrap().to_string();
        aathoos_free_string(message);
        assert!(text.contains("unsupported log level"));

        let null_message = aathoos_init_logging(ptr::null(), dir.as_ptr());
        assert!(!null_message.is_null());
        aathoos_free_string(null_message);
    }
}
