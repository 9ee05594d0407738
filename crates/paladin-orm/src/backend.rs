//! Backing-store access interface
//!
//! Records never talk to a database directly; every operation goes through
//! one call on a `Backend`. Implementations acquire and release their own
//! connection per call.

use crate::errors::Result;
use crate::row::{Filters, Row};
use crate::value::Value;

pub trait Backend {
    /// Insert one row and return the identity assigned by the store
    ///
    /// # Errors
    ///
    /// Store failures (constraint violation, connectivity) are returned as
    /// `Persistence` errors carrying the driver message.
    fn insert(&self, table: &str, values: &[(&str, Value)]) -> Result<i64>;

    /// Update the row with identity `id`, returning the affected row count
    ///
    /// # Errors
    ///
    /// As for [`Backend::insert`].
    fn update(&self, table: &str, id: i64, values: &[(&str, Value)]) -> Result<usize>;

    /// Read rows matching every filter, in the store's natural order
    ///
    /// # Errors
    ///
    /// As for [`Backend::insert`].
    fn select(
        &self,
        table: &str,
        filters: &Filters,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>>;

    /// Delete rows matching every filter, returning the affected row count
    ///
    /// # Errors
    ///
    /// As for [`Backend::insert`].
    fn delete(&self, table: &str, filters: &Filters) -> Result<usize>;

    /// Delete every row of `table`
    ///
    /// # Errors
    ///
    /// As for [`Backend::insert`].
    fn delete_all(&self, table: &str) -> Result<usize>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn insert(&self, table: &str, values: &[(&str, Value)]) -> Result<i64> {
        (**self).insert(table, values)
    }

    fn update(&self, table: &str, id: i64, values: &[(&str, Value)]) -> Result<usize> {
        (**self).update(table, id, values)
    }

    fn select(
        &self,
        table: &str,
        filters: &Filters,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>> {
        (**self).select(table, filters, limit, offset)
    }

    fn delete(&self, table: &str, filters: &Filters) -> Result<usize> {
        (**self).delete(table, filters)
    }

    fn delete_all(&self, table: &str) -> Result<usize> {
        (**self).delete_all(table)
    }
}
