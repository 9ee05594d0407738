//! Error handling for paladin-orm
//!
//! Wraps the paladin-core `ExError` with backing-store helpers. Store
//! failures keep the driver's message unchanged.

use paladin_core::errors::{ExError, ExErrorKind, PaladinError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a database error from a pool checkout failure
pub fn from_pool(err: r2d2::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("pool")
        .with_message(err.to_string())
}

/// Create a schema error
pub fn schema_error(table: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("ensure_table")
        .with_entity(table)
        .with_message(reason.to_string())
}

/// Reject table or column names that are not plain identifiers
pub fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PaladinError::InvalidIdentifier {
            name: name.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_identifier() {
        assert!(check_identifier("users").is_ok());
        assert!(check_identifier("_tmp2").is_ok());
        assert!(check_identifier("").is_err());
        assert!(check_identifier("2fast").is_err());
        assert!(check_identifier("name; DROP TABLE users").is_err());
        assert!(check_identifier("a\"b").is_err());
    }
}
