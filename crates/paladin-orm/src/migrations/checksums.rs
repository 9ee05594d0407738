//! Checksums of table descriptors
//!
//! The checksum covers the generated DDL, so any column added, removed or
//! retyped yields a new value.

use crate::schema::TableDef;
use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of the DDL a table descriptor generates
pub fn table_checksum(table: &TableDef) -> String {
    compute_checksum(&table.create_sql())
}
