//! SQLite backing store
//!
//! Translates `Backend` calls into parameterised SQL. Table and column names
//! are checked as plain identifiers and quoted; values are always bound.

#![allow(clippy::result_large_err)]

use crate::backend::Backend;
use crate::db::{open_pool, Pool, PooledConnection};
use crate::errors::{check_identifier, from_pool, from_rusqlite, Result};
use crate::row::{Filters, Row};
use crate::schema::ID_COLUMN;
use crate::value::Value;
use paladin_core::DbConfig;
use rusqlite::params_from_iter;

/// Backend over an r2d2 pool of SQLite connections
#[derive(Clone)]
pub struct SqliteBackend {
    pool: Pool,
}

impl SqliteBackend {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Fresh in-memory database (for testing)
    ///
    /// # Errors
    ///
    /// Fails when SQLite cannot open the connection.
    pub fn in_memory() -> Result<Self> {
        open_pool(&DbConfig::default()).map(Self::new)
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Check a connection out of the pool; it returns on drop
    ///
    /// # Errors
    ///
    /// Fails when the pool times out waiting for a connection.
    pub fn connection(&self) -> Result<PooledConnection> {
        self.pool.get().map_err(from_pool)
    }

    fn execute(&self, sql: &str, params: Vec<&Value>) -> Result<usize> {
        tracing::trace!(sql, params = params.len(), "execute");
        let conn = self.connection()?;
        conn.execute(sql, params_from_iter(params))
            .map_err(from_rusqlite)
    }
}

/// Largest LIMIT/OFFSET SQLite accepts; anything above reads as "all rows"
const MAX_ROWS: u64 = i64::MAX as u64;

fn quote(name: &str) -> Result<String> {
    check_identifier(name)?;
    Ok(format!("\"{}\"", name))
}

/// `WHERE` clause and its bound values, empty when there are no filters
fn where_clause(filters: &Filters) -> Result<(String, Vec<&Value>)> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let mut conditions = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());
    for (column, value) in filters.iter() {
        let column = quote(column)?;
        if value.is_null() {
            conditions.push(format!("{} IS NULL", column));
        } else {
            params.push(value);
            conditions.push(format!("{} = ?{}", column, params.len()));
        }
    }
    Ok((format!(" WHERE {}", conditions.join(" AND ")), params))
}

impl Backend for SqliteBackend {
    fn insert(&self, table: &str, values: &[(&str, Value)]) -> Result<i64> {
        let table = quote(table)?;
        let sql = if values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let columns = values
                .iter()
                .map(|(c, _)| quote(c))
                .collect::<Result<Vec<_>>>()?;
            let placeholders = (1..=values.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        tracing::trace!(sql = %sql, "insert");

        // last_insert_rowid is per connection, so read it before the
        // connection goes back to the pool
        let conn = self.connection()?;
        conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))
            .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, table: &str, id: i64, values: &[(&str, Value)]) -> Result<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        let assignments = values
            .iter()
            .enumerate()
            .map(|(i, (c, _))| quote(c).map(|c| format!("{} = ?{}", c, i + 1)))
            .collect::<Result<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE \"{}\" = ?{}",
            quote(table)?,
            assignments.join(", "),
            ID_COLUMN,
            values.len() + 1
        );

        let id = Value::Integer(id);
        let params = values
            .iter()
            .map(|(_, v)| v)
            .chain(std::iter::once(&id))
            .collect();
        self.execute(&sql, params)
    }

    fn select(
        &self,
        table: &str,
        filters: &Filters,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>> {
        let (clause, params) = where_clause(filters)?;
        let mut sql = format!("SELECT * FROM {}{}", quote(table)?, clause);
        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
        let limit = limit.map(|n| n.min(MAX_ROWS));
        let offset = offset.map(|n| n.min(MAX_ROWS));
        match (limit, offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }
        tracing::trace!(sql = %sql, "select");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let rows = stmt
            .query_map(params_from_iter(params), |sql_row| {
                let mut row = Row::new(table);
                for (i, name) in names.iter().enumerate() {
                    row.push(name.clone(), Value::from(sql_row.get_ref(i)?));
                }
                Ok(row)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    fn delete(&self, table: &str, filters: &Filters) -> Result<usize> {
        let (clause, params) = where_clause(filters)?;
        let sql = format!("DELETE FROM {}{}", quote(table)?, clause);
        self.execute(&sql, params)
    }

    fn delete_all(&self, table: &str) -> Result<usize> {
        let sql = format!("DELETE FROM {}", quote(table)?);
        self.execute(&sql, Vec::new())
    }
}
