//! Paladin ORM - active records over a pooled SQLite backing store
//!
//! Provides:
//! - `Record` trait: query/create/save/delete with dirty-field tracking
//! - `Backend` trait: the five calls a backing store must answer
//! - `SqliteBackend`: rusqlite + r2d2 implementation
//! - `ensure_tables`: table bootstrap from `TableDef` descriptors

pub mod backend;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod record;
pub mod repo;
pub mod row;
pub mod schema;
pub mod value;

// Re-export key types
pub use backend::Backend;
pub use db::{open_pool, setup_db};
pub use errors::Result;
pub use migrations::ensure_tables;
pub use record::{Record, RecordState};
pub use repo::SqliteBackend;
pub use row::{Filters, Row};
pub use schema::{Column, ColumnType, TableDef, ID_COLUMN};
pub use value::{FromValue, Value};
