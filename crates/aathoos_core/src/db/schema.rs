//! Table creation at open.
//!
//! # Responsibility
//! - Create the four entity tables and their list indexes on a fresh file.
//! - Stamp the file with `SCHEMA_VERSION` and refuse files stamped by a
//!   newer build.
//!
//! # Invariants
//! - There is exactly one schema; nothing here rewrites existing tables.
//! - Creation runs in one transaction: a file is either empty or complete.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Version written to `PRAGMA user_version` once the tables exist.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates missing tables, or checks that an existing file is compatible.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!("event=db_schema_create module=db status=ok version={SCHEMA_VERSION}");
    Ok(())
}
