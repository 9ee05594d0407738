//! Core types shared across Paladin facilities
//!
//! This crate provides foundational types used by the error, logging and
//! HTTP facilities:
//!
//! - **Correlation types**: RequestId, TraceId
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: log event names and the trace context key

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestId, TraceId};
pub use sensitive::{display_header_value, Sensitive};
