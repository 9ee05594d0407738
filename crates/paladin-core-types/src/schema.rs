//! Shared names for structured log events
//!
//! Operation events carry `component`, `op` and `event` fields; the values
//! of `event` are fixed here so CLI logs and test assertions agree.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Context variable holding the per-task trace value
pub const CONTEXT_TRACE: &str = "trace";
