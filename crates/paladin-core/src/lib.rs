//! Paladin Core - shared configuration, logging, errors and utilities
//!
//! This crate provides the ambient layer every other Paladin crate builds on:
//! - Canonical error facility (`ExError`, `ExErrorKind`, `PaladinError`)
//! - Layered application configuration (`AppConfig`)
//! - Logging facility with a per-thread context column
//! - File, string and shell helpers used by the CLI

pub mod conf;
pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod utils;

/// Re-exported so the logging macros resolve schema constants
pub use paladin_core_types as types;

// Re-export commonly used types
pub use conf::{AppConfig, DbConfig, HttpClientConfig};
pub use errors::{ExError, ExErrorKind, PaladinError, Result};
pub use logging_facility::LogConfig;
