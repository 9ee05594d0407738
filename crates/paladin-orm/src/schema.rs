//! Backing table descriptors
//!
//! Each record type binds itself to one `TableDef` through an associated
//! constant. The descriptor is also what `ensure_tables` turns into DDL.

use crate::errors::{check_identifier, Result};

/// Primary key column shared by every table
pub const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
    Boolean,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub const fn real(name: &'static str) -> Self {
        Self::new(name, ColumnType::Real)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub const fn blob(name: &'static str) -> Self {
        Self::new(name, ColumnType::Blob)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Column definition fragment, e.g. `"name" TEXT`
    pub fn definition(&self) -> String {
        format!("\"{}\" {}", self.name, self.kind.sql())
    }
}

/// A backing table: its name and data columns (the `id` column is implicit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableDef {
    pub const fn new(name: &'static str, columns: &'static [Column]) -> Self {
        Self { name, columns }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Validate table and column names
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a name that is not a plain identifier, or on a
    /// column named `id`.
    pub fn validate(&self) -> Result<()> {
        check_identifier(self.name)?;
        for column in self.columns {
            check_identifier(column.name)?;
            if column.name == ID_COLUMN {
                return Err(paladin_core::PaladinError::InvalidInput {
                    reason: format!("{}: `id` is managed by the store", self.name),
                }
                .into());
            }
        }
        Ok(())
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this table
    pub fn create_sql(&self) -> String {
        let mut defs = vec![format!("\"{}\" INTEGER PRIMARY KEY AUTOINCREMENT", ID_COLUMN)];
        defs.extend(self.columns.iter().map(Column::definition));
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            self.name,
            defs.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: TableDef = TableDef::new("users", &[Column::text("name"), Column::integer("age")]);

    #[test]
    fn test_create_sql() {
        assert_eq!(
            USERS.create_sql(),
            "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \"name\" TEXT, \"age\" INTEGER)"
        );
    }

    #[test]
    fn test_validate_rejects_explicit_id() {
        const BAD: TableDef = TableDef::new("bad", &[Column::integer("id")]);
        assert!(BAD.validate().is_err());
        assert!(USERS.validate().is_ok());
    }

    #[test]
    fn test_column_lookup() {
        assert_eq!(USERS.column("age").map(|c| c.kind), Some(ColumnType::Integer));
        assert!(USERS.column("email").is_none());
    }
}
