use aathoos_core::db::schema::SCHEMA_VERSION;
use aathoos_core::{
    Database, DbError, NewTask, Priority, RepoError, SqliteTaskRepository, TaskRepository,
};
use rusqlite::Connection;

#[test]
fn open_creates_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aathoos.db");

    let db = Database::open(&path).unwrap();
    db.close().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    for table in ["tasks", "notes", "goals", "study_sessions"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_keeps_existing_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aathoos.db");

    let created = {
        let db = Database::open(&path).unwrap();
        let task = SqliteTaskRepository::new(&db)
            .create(&NewTask::new("persist me", Priority::Low))
            .unwrap();
        db.close().unwrap();
        task
    };

    let db = Database::open(&path).unwrap();
    let loaded = SqliteTaskRepository::new(&db).get(created.id).unwrap();
    assert_eq!(loaded, Some(created));
}

#[test]
fn opening_database_with_newer_schema_version_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match Database::open(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_corrupt_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let err = Database::open(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)), "unexpected error: {err}");
}

#[test]
fn opening_unwritable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/aathoos.db");

    assert!(matches!(Database::open(&path), Err(DbError::Sqlite(_))));
}

#[test]
fn independent_handles_do_not_share_state() {
    let first = Database::open_in_memory().unwrap();
    let second = Database::open_in_memory().unwrap();

    SqliteTaskRepository::new(&first)
        .create(&NewTask::new("only in first", Priority::Medium))
        .unwrap();

    assert_eq!(SqliteTaskRepository::new(&first).list_all().unwrap().len(), 1);
    assert!(SqliteTaskRepository::new(&second).list_all().unwrap().is_empty());
}

#[test]
fn handle_serializes_writers_across_threads() {
    let db = Database::open_in_memory().unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let db = &db;
            scope.spawn(move || {
                let repo = SqliteTaskRepository::new(db);
                for index in 0..25 {
                    repo.create(&NewTask::new(
                        format!("worker {worker} task {index}"),
                        Priority::Low,
                    ))
                    .unwrap();
                }
            });
        }
    });

    assert_eq!(SqliteTaskRepository::new(&db).list_all().unwrap().len(), 100);
}

#[test]
fn corrupted_row_surfaces_as_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aathoos.db");
    {
        let db = Database::open(&path).unwrap();
        SqliteTaskRepository::new(&db)
            .create(&NewTask::new("to be mangled", Priority::High))
            .unwrap();
        db.close().unwrap();
    }

    let conn = Connection::open(&path).unwrap();
    conn.execute("UPDATE tasks SET id = 'not-a-uuid';", []).unwrap();
    drop(conn);

    let db = Database::open(&path).unwrap();
    let err = SqliteTaskRepository::new(&db).list_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "unexpected error: {err}");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
