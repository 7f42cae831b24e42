//! SQLite storage handle and schema bootstrap.
//!
//! # Responsibility
//! - Own the single connection behind every store operation.
//! - Serialize access to that connection across callers.
//! - Apply schema bootstrap before any record is read or written.
//!
//! # Invariants
//! - A `Database` value always wraps a fully bootstrapped connection.
//! - `close` consumes the handle; a closed handle cannot be used again.
//! - Schema version is tracked via `PRAGMA user_version`.

use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

pub mod schema;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, bootstrap or close a database session.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Owned handle to one open database session.
///
/// Every entity store borrows a `Database`; the connection is locked for the
/// duration of a single store operation, so writes never interleave.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the database file at `path` and creates missing tables.
    ///
    /// # Errors
    /// - `DbError::Sqlite` when the path is unwritable or the file is not a
    ///   SQLite database.
    /// - `DbError::UnsupportedSchemaVersion` when the file was written by a
    ///   newer schema.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    /// Opens a private in-memory database. Contents vanish on close.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Releases the session.
    ///
    /// Consuming `self` makes any further use a compile error. Dropping the
    /// handle also releases the session, but silently discards close errors.
    pub fn close(self) -> DbResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Runs `f` with exclusive access to the underlying connection.
    ///
    /// A panic inside an earlier holder does not leave SQLite in a torn state
    /// (each statement is atomic), so a poisoned lock is recovered.
    pub(crate) fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> T) -> T {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
