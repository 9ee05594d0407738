//! Structured logging facility
//!
//! - Single initialization point via `init(profile)` or `init_with_config(&LogConfig)`
//! - Context column fed by the per-thread variables of [`crate::context`]
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use paladin_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_config, ContextFormat, LogConfig, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
