//! Table bootstrap
//!
//! Provides:
//! - `ensure_tables`: create missing tables from their `TableDef`
//! - Checksums recorded in `schema_version` so unchanged tables are skipped
//! - Missing columns added to existing tables when a descriptor grows

mod checksums;
mod runner;

pub use runner::{ensure_tables, SCHEMA_VERSION_TABLE};
