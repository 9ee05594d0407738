//! Subcommand implementations

pub mod curl;
pub mod db;
pub mod disk;
pub mod file;
pub mod network;

use paladin_core::context;
use paladin_core::errors::Result;
use paladin_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Run `f` between `start` and `end`/`end_error` log events
///
/// Errors leave with the thread's trace id attached.
pub fn timed<T>(op: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op);
    let started = Instant::now();
    let result = f().map_err(|e| match context::trace() {
        Some(trace) if e.trace_id().is_none() => e.with_trace_id(trace),
        _ => e,
    });
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!(op, e, duration_ms = duration_ms);
        }
    }
    result
}
