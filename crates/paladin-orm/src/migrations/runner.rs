//! Table bootstrap runner
//!
//! Creates tables with checksums and idempotency

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, schema_error, Result};
use crate::migrations::checksums::table_checksum;
use crate::schema::TableDef;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::collections::HashSet;

/// Bookkeeping table, one row per managed table
pub const SCHEMA_VERSION_TABLE: &str = "schema_version";

/// Create or extend every table in `tables`
///
/// Tables whose recorded checksum matches are left alone. A table that
/// already exists with a stale checksum gets its missing columns added;
/// columns are never dropped or retyped.
///
/// # Errors
///
/// Returns a `Persistence` error when a descriptor is invalid or a statement
/// fails. Each table is applied in its own transaction.
pub fn ensure_tables(conn: &mut Connection, tables: &[&TableDef]) -> Result<()> {
    create_schema_version_table(conn)?;

    for table in tables {
        table
            .validate()
            .map_err(|e| schema_error(table.name, e.message()))?;
        ensure_table(conn, table)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            table_name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT NOT NULL
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

fn ensure_table(conn: &mut Connection, table: &TableDef) -> Result<()> {
    let checksum = table_checksum(table);
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE table_name = ?1",
            [table.name],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    if recorded.as_deref() == Some(checksum.as_str()) {
        // Idempotent: already up to date
        return Ok(());
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(&table.create_sql())
        .map_err(|e| schema_error(table.name, &e.to_string()))?;
    add_missing_columns(&tx, table)?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (table_name, applied_at, checksum) VALUES (?1, ?2, ?3)
         ON CONFLICT(table_name) DO UPDATE SET applied_at = excluded.applied_at, checksum = excluded.checksum",
        rusqlite::params![table.name, now, checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(table = table.name, "table ensured");
    Ok(())
}

/// `ALTER TABLE ... ADD COLUMN` for descriptor columns the table lacks
fn add_missing_columns(tx: &Transaction<'_>, table: &TableDef) -> Result<()> {
    let existing = existing_columns(tx, table.name)?;

    for column in table.columns {
        if existing.contains(column.name) {
            continue;
        }
        let sql = format!(
            "ALTER TABLE \"{}\" ADD COLUMN {}",
            table.name,
            column.definition()
        );
        tx.execute_batch(&sql)
            .map_err(|e| schema_error(table.name, &e.to_string()))?;
        tracing::debug!(table = table.name, column = column.name, "column added");
    }

    Ok(())
}

fn existing_columns(tx: &Transaction<'_>, table: &str) -> Result<HashSet<String>> {
    let mut stmt = tx
        .prepare(&format!("PRAGMA table_info(\"{}\")", table))
        .map_err(from_rusqlite)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<HashSet<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    const NOTES: TableDef = TableDef::new("notes", &[Column::text("title")]);

    #[test]
    fn test_ensure_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        let result = ensure_tables(&mut conn, &[&NOTES]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_idempotency() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_tables(&mut conn, &[&NOTES]).unwrap();
        let result = ensure_tables(&mut conn, &[&NOTES]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_descriptor_is_rejected() {
        const BAD: TableDef = TableDef::new("bad table", &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let err = ensure_tables(&mut conn, &[&BAD]).unwrap_err();
        assert_eq!(err.entity(), Some("bad table"));
    }
}
