use cardguard_core::db::migrations::{apply_migrations, latest_version};
use cardguard_core::db::{init_db, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "cards");
}

#[test]
fn init_db_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.db");

    let conn_first = init_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO cards (holder_name, number_digits, expiry, password_hash, cvv, created_at)
             VALUES ('Ana', '4111111111111111', '09/27', 'h', '123', '2026-01-01T00:00:00Z');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let mut conn_second = init_db(&path).unwrap();
    apply_migrations(&mut conn_second).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(table_count(&conn_second, "cards"), 1);
    assert_eq!(row_count(&conn_second), 1);
}

#[test]
fn open_db_does_not_create_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
    assert_eq!(table_count(&conn, "cards"), 0);
}

#[test]
fn init_db_adopts_untracked_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            holder_name TEXT NOT NULL,
            number_digits TEXT NOT NULL,
            expiry TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            cvv TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
    .unwrap();
    drop(conn);

    let conn = init_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(table_count(&conn, "cards"), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = init_db(&path).unwrap_err();
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
fn open_db_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("cards.db");

    assert!(matches!(open_db(&path), Err(DbError::Sqlite(_))));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM cards;", [], |row| row.get(0))
        .unwrap()
}

fn table_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*)
         FROM sqlite_master
         WHERE type = 'table' AND name = ?1;",
        [table_name],
        |row| row.get(0),
    )
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_eq!(
        table_count(conn, table_name),
        1,
        "table {table_name} does not exist"
    );
}
