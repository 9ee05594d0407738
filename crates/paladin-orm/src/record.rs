//! Active records with dirty-field tracking
//!
//! A record type owns a [`RecordState`] and exposes setters that call
//! [`RecordState::touch`]. The [`Record`] trait supplies the lifecycle
//! operations; each one is a single call on the injected [`Backend`].
//!
//! Null values are never written: inserts carry every non-null column and
//! updates carry the dirty non-null columns.
//!
//! # Example
//!
//! ```
//! use paladin_orm::{Column, Record, RecordState, Result, Row, TableDef, Value};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     state: RecordState,
//!     name: Option<String>,
//! }
//!
//! impl User {
//!     fn set_name(&mut self, name: impl Into<String>) {
//!         self.name = Some(name.into());
//!         self.state.touch("name");
//!     }
//! }
//!
//! impl Record for User {
//!     const TABLE: TableDef = TableDef::new("users", &[Column::text("name")]);
//!
//!     fn state(&self) -> &RecordState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut RecordState {
//!         &mut self.state
//!     }
//!
//!     fn values(&self) -> Vec<(&'static str, Value)> {
//!         vec![("name", self.name.clone().into())]
//!     }
//!
//!     fn from_row(row: &Row) -> Result<Self> {
//!         Ok(Self {
//!             state: RecordState::default(),
//!             name: row.get("name")?,
//!         })
//!     }
//! }
//!
//! let mut user = User::default();
//! user.set_name("foo");
//! assert!(user.state().is_field_dirty("name"));
//! assert!(user.id().is_none());
//! ```

#![allow(clippy::result_large_err)]

use crate::backend::Backend;
use crate::errors::Result;
use crate::row::{Filters, Row};
use crate::schema::{TableDef, ID_COLUMN};
use crate::value::Value;
use paladin_core::errors::PaladinError;
use std::collections::BTreeSet;

/// Identity and dirty-set of one record instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordState {
    id: Option<i64>,
    dirty: BTreeSet<&'static str>,
}

impl RecordState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsaved state with `fields` already dirty (values set at construction)
    pub fn with_dirty(fields: &[&'static str]) -> Self {
        Self {
            id: None,
            dirty: fields.iter().copied().collect(),
        }
    }

    /// Mark `field` as changed since the last create/save
    pub fn touch(&mut self, field: &'static str) {
        self.dirty.insert(field);
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_field_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Dirty field names in name order
    pub fn dirty_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.iter().copied()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Record the identity assigned by the store and start clean
    pub fn mark_saved(&mut self, id: i64) {
        self.id = Some(id);
        self.dirty.clear();
    }
}

/// A domain type persisted as one row of [`Record::TABLE`]
pub trait Record: Sized {
    /// Backing table this type maps to
    const TABLE: TableDef;

    fn state(&self) -> &RecordState;

    fn state_mut(&mut self) -> &mut RecordState;

    /// Current value of every data column (not `id`)
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Build a record from a stored row
    ///
    /// Implementations read data columns only; the identity is applied by
    /// the caller.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Serialization` when a column is missing or mistyped.
    fn from_row(row: &Row) -> Result<Self>;

    fn id(&self) -> Option<i64> {
        self.state().id()
    }

    /// Materialise a stored row into a clean record
    ///
    /// # Errors
    ///
    /// As for [`Record::from_row`], and when `id` is missing.
    fn load(row: &Row) -> Result<Self> {
        let id = row.id()?;
        let mut record = Self::from_row(row)?;
        record.state_mut().mark_saved(id);
        Ok(record)
    }

    /// Rows matching every filter, in the store's natural order
    ///
    /// # Errors
    ///
    /// Backing-store errors, or row conversion errors.
    fn query(
        backend: &impl Backend,
        filters: &Filters,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Self>> {
        backend
            .select(Self::TABLE.name, filters, limit, offset)?
            .iter()
            .map(Self::load)
            .collect()
    }

    /// Every row of the table
    ///
    /// # Errors
    ///
    /// As for [`Record::query`].
    fn query_all(backend: &impl Backend) -> Result<Vec<Self>> {
        Self::query(backend, &Filters::new(), None, None)
    }

    /// First row matching `filters`, if any
    ///
    /// # Errors
    ///
    /// As for [`Record::query`].
    fn find_one(backend: &impl Backend, filters: &Filters) -> Result<Option<Self>> {
        Ok(Self::query(backend, filters, Some(1), None)?.into_iter().next())
    }

    /// Insert this record and take the identity the store assigns
    ///
    /// # Errors
    ///
    /// `InvalidState` if the record already has an id; backing-store errors
    /// otherwise. The record is unchanged on failure.
    fn create(&mut self, backend: &impl Backend) -> Result<()> {
        if let Some(id) = self.id() {
            return Err(PaladinError::RecordAlreadyCreated {
                table: Self::TABLE.name.to_string(),
                id,
            }
            .into());
        }

        let values: Vec<(&str, Value)> = self
            .values()
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect();
        let id = backend.insert(Self::TABLE.name, &values)?;
        self.state_mut().mark_saved(id);
        Ok(())
    }

    /// Write the dirty columns of a created record
    ///
    /// A clean record issues no write. Dirty columns holding null are left
    /// out of the update but still count as flushed.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the record was never created; backing-store errors
    /// otherwise, leaving the dirty-set intact.
    fn save(&mut self, backend: &impl Backend) -> Result<()> {
        let id = self.require_id("save")?;
        if !self.state().is_dirty() {
            return Ok(());
        }

        let state = self.state();
        let values: Vec<(&str, Value)> = self
            .values()
            .into_iter()
            .filter(|(name, v)| state.is_field_dirty(name) && !v.is_null())
            .collect();
        if !values.is_empty() {
            backend.update(Self::TABLE.name, id, &values)?;
        }
        self.state_mut().clear_dirty();
        Ok(())
    }

    /// Remove this record's row
    ///
    /// # Errors
    ///
    /// `InvalidState` if the record was never created; backing-store errors
    /// otherwise.
    fn delete(&self, backend: &impl Backend) -> Result<()> {
        let id = self.require_id("delete")?;
        backend.delete(Self::TABLE.name, &Filters::new().eq(ID_COLUMN, id))?;
        Ok(())
    }

    /// Remove every row matching `filters`, returning how many went
    ///
    /// # Errors
    ///
    /// `InvalidState` when `filters` is empty (use [`Record::delete_all`]);
    /// backing-store errors otherwise.
    fn delete_where(backend: &impl Backend, filters: &Filters) -> Result<usize> {
        if filters.is_empty() {
            return Err(PaladinError::MissingFilters {
                table: Self::TABLE.name.to_string(),
            }
            .into());
        }
        backend.delete(Self::TABLE.name, filters)
    }

    /// Remove every row of the table, with no confirmation
    ///
    /// # Errors
    ///
    /// Backing-store errors.
    fn delete_all(backend: &impl Backend) -> Result<usize> {
        backend.delete_all(Self::TABLE.name)
    }

    #[doc(hidden)]
    fn require_id(&self, op: &str) -> Result<i64> {
        self.id().ok_or_else(|| {
            PaladinError::RecordNotCreated {
                table: Self::TABLE.name.to_string(),
                op: op.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_and_clear() {
        let mut state = RecordState::new();
        state.touch("name");
        state.touch("age");
        state.touch("name");

        assert_eq!(state.dirty_fields().collect::<Vec<_>>(), vec!["age", "name"]);

        state.clear_dirty();
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_mark_saved_sets_id_and_cleans() {
        let mut state = RecordState::with_dirty(&["name"]);
        assert!(!state.is_created());

        state.mark_saved(7);

        assert_eq!(state.id(), Some(7));
        assert!(state.is_created());
        assert!(!state.is_dirty());
    }
}
