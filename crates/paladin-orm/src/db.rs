//! Database connection management
//!
//! Builds the r2d2 pool of SQLite connections that every backend call
//! checks a connection out of.

#![allow(clippy::result_large_err)]

use crate::errors::{from_pool, Result};
use crate::migrations::ensure_tables;
use crate::repo::SqliteBackend;
use crate::schema::TableDef;
use paladin_core::DbConfig;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub type Pool = r2d2::Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open a connection pool for the configured database
///
/// An in-memory database lives inside a single connection, so its pool is
/// capped at one connection that is never recycled.
///
/// # Errors
///
/// Returns a `Persistence` error when the first connection cannot be opened.
pub fn open_pool(conf: &DbConfig) -> Result<Pool> {
    let in_memory = conf.is_in_memory();
    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(&conf.database)
    }
    .with_init(move |conn| configure(conn, !in_memory));

    let builder = r2d2::Pool::builder();
    let builder = if in_memory {
        // Retiring the only connection would drop the whole database
        builder.max_size(1).max_lifetime(None).idle_timeout(None)
    } else {
        builder.max_size(conf.pool_size)
    };
    builder.build(manager).map_err(from_pool)
}

/// Configure a connection with the settings every pooled connection shares
pub fn configure(conn: &mut Connection, wal: bool) -> rusqlite::Result<()> {
    // Enable foreign keys
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;

    // File databases only; journal_mode is meaningless in memory
    if wal {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
    }
    Ok(())
}

/// Open the backing store described by `conf`
///
/// When `auto_create_tables` is set, `tables` are created (or extended with
/// missing columns) before the backend is returned.
///
/// # Errors
///
/// Fails when the pool cannot be opened or a table cannot be created.
pub fn setup_db(conf: &DbConfig, tables: &[&TableDef]) -> Result<SqliteBackend> {
    let pool = open_pool(conf)?;
    if conf.auto_create_tables && !tables.is_empty() {
        tracing::trace!("create tables");
        let mut conn = pool.get().map_err(from_pool)?;
        ensure_tables(&mut conn, tables)?;
    }
    Ok(SqliteBackend::new(pool))
}
