//! Correlation identifiers for HTTP exchanges and log context
//!
//! A `RequestId` tags every request issued by the HTTP client so the request
//! and response log lines can be paired. A `TraceId` is the value carried by
//! the `trace` context variable and printed in the log context column.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new random, time-ordered identifier (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Get the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier of a single outgoing HTTP request
    RequestId
);

correlation_id!(
    /// Caller-chosen trace value shown in the log context column
    ///
    /// Unlike `RequestId` this is usually supplied by the caller
    /// (`TraceId::from("task-1")`); `new()` is a convenience for callers
    /// that just need something unique.
    TraceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_trace_id_from_caller_value() {
        let id = TraceId::from("trace-task1");
        assert_eq!(id.as_str(), "trace-task1");
        assert_eq!(id, TraceId::from("trace-task1".to_string()));
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = TraceId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");

        let deserialized: TraceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
