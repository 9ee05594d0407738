//! Repository layer - backing store implementations

pub mod sqlite_repo;

pub use sqlite_repo::SqliteBackend;
