// Integration tests for table bootstrap

use paladin_orm::{ensure_tables, Column, TableDef};
use rusqlite::Connection;

const NOTES_V1: TableDef = TableDef::new("notes", &[Column::text("title")]);
const NOTES_V2: TableDef = TableDef::new("notes", &[Column::text("title"), Column::boolean("done")]);
const TAGS: TableDef = TableDef::new("tags", &[Column::text("label")]);

// Helper to create test DB
fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

fn get_column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .unwrap();
    stmt.query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_ensure_tables_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Two tables are ensured
    ensure_tables(&mut conn, &[&NOTES_V1, &TAGS]).unwrap();

    // Then: Both exist next to the bookkeeping tables
    assert_eq!(
        get_table_names(&conn),
        vec!["notes", "schema_version", "sqlite_sequence", "tags"]
    );
    assert_eq!(get_column_names(&conn, "notes"), vec!["id", "title"]);
}

#[test]
fn test_ensure_tables_idempotency() {
    // Given: Tables already ensured
    let mut conn = setup_test_db();
    ensure_tables(&mut conn, &[&NOTES_V1]).unwrap();
    let applied_at: i64 = conn
        .query_row(
            "SELECT applied_at FROM schema_version WHERE table_name = 'notes'",
            [],
            |row| row.get(0),
        )
        .unwrap();

    // When: Ensured again with the same descriptor
    ensure_tables(&mut conn, &[&NOTES_V1]).unwrap();

    // Then: One bookkeeping row, untouched
    let (count, again): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), MAX(applied_at) FROM schema_version",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(again, applied_at);
}

#[test]
fn test_grown_descriptor_adds_columns_and_keeps_rows() {
    // Given: A notes table with one row
    let mut conn = setup_test_db();
    ensure_tables(&mut conn, &[&NOTES_V1]).unwrap();
    conn.execute("INSERT INTO notes (title) VALUES ('kept')", [])
        .unwrap();

    // When: The descriptor gains a column
    ensure_tables(&mut conn, &[&NOTES_V2]).unwrap();

    // Then: The column exists and the row survived
    assert_eq!(get_column_names(&conn, "notes"), vec!["id", "title", "done"]);
    let title: String = conn
        .query_row("SELECT title FROM notes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "kept");
}

#[test]
fn test_checksum_recorded_per_table() {
    let mut conn = setup_test_db();
    ensure_tables(&mut conn, &[&NOTES_V1]).unwrap();
    let v1: String = conn
        .query_row("SELECT checksum FROM schema_version WHERE table_name = 'notes'", [], |row| {
            row.get(0)
        })
        .unwrap();

    ensure_tables(&mut conn, &[&NOTES_V2]).unwrap();
    let v2: String = conn
        .query_row("SELECT checksum FROM schema_version WHERE table_name = 'notes'", [], |row| {
            row.get(0)
        })
        .unwrap();

    assert_eq!(v1.len(), 64); // SHA256 is 64 hex chars
    assert_ne!(v1, v2);
}
