use rusqlite::Connection;
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, open_with_config, DbError};
use todo_core::{open_store, ErrorKind, SqliteTodoRepository, StoreConfig, TodoService};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "todos");
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO todos (task) VALUES ('persisted');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_with_config_uses_file_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.sqlite3");

    let conn = open_with_config(&StoreConfig::file(&path)).unwrap();
    assert_table_exists(&conn, "todos");
    assert!(path.exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn service_construction_reports_storage_unavailable() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();

    let err = TodoService::try_new(SqliteTodoRepository::new(&conn))
        .err()
        .expect("newer schema must fail construction");
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
}

#[test]
fn opening_unreachable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("todo.sqlite3");

    assert!(matches!(open_db(&path), Err(DbError::Sqlite(_))));
}

#[test]
fn open_store_reports_unreachable_path_as_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("todo.sqlite3");

    let err = open_store(&StoreConfig::file(&path))
        .err()
        .expect("missing parent directory must fail");
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
}

#[test]
fn open_store_reports_newer_schema_as_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_store(&StoreConfig::file(&path))
        .err()
        .expect("newer schema must fail");
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
}

#[test]
fn open_store_then_gateway_serves_requests() {
    let conn = open_store(&StoreConfig::memory()).unwrap();
    let service = TodoService::try_new(SqliteTodoRepository::new(&conn)).unwrap();
    assert!(service.fetch_todos().unwrap().is_empty());
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
