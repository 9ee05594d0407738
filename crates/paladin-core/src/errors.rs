use paladin_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced by the toolkit is classified by one of these kinds.
/// Each kind maps to a stable code usable for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    InvalidInput,
    /// Operation attempted in a lifecycle phase that forbids it
    InvalidState,
    NotFound,
    AlreadyExists,

    // Integration/IO
    Io,
    Serialization,
    /// Failure reported by the backing store, message kept verbatim
    Persistence,
    Config,
    ExternalService,
    Timeout,
    /// Shell command exited with an unexpected status
    Command,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Command => "ERR_COMMAND",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields support programmatic handling; the optional context
/// fields (operation, table, record id, correlation ids) support debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (table) context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (table: {})", entity)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Paladin operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaladinError {
    // ===== Record lifecycle =====
    /// `create()` on a record that already has an id
    #[error("Cannot create an existing object: {table} id {id}")]
    RecordAlreadyCreated { table: String, id: i64 },

    /// `save()`/`delete()` on a record that was never created
    #[error("Cannot {op} a new object in {table}")]
    RecordNotCreated { table: String, op: String },

    /// Filtered delete called without any filter
    #[error("No filters provided for delete on {table}")]
    MissingFilters { table: String },

    // ===== Schema / row mapping =====
    #[error("Invalid identifier: {name:?}")]
    InvalidIdentifier { name: String },

    #[error("Column {column} missing from row of {table}")]
    MissingColumn { table: String, column: String },

    #[error("Column {column}: expected {expected}, found {found}")]
    ColumnType {
        column: String,
        expected: String,
        found: String,
    },

    // ===== Filesystem =====
    #[error("Path does not exist: {path}")]
    PathNotFound { path: String },

    #[error("Destination is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Destination file already exists: {path}")]
    FileExists { path: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    // ===== External processes and services =====
    #[error("Command `{cmd}` exited with status {status}")]
    CommandFailed {
        cmd: String,
        status: i32,
        output: String,
    },

    #[error("{method} {url} failed: {message}")]
    Http {
        method: String,
        url: String,
        message: String,
    },

    #[error("{method} {url} returned {status}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
    },

    #[error("{method} {url} timed out")]
    HttpTimeout { method: String, url: String },

    // ===== Generic =====
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<PaladinError> for ExError {
    fn from(err: PaladinError) -> Self {
        let message = err.to_string();
        match err {
            PaladinError::RecordAlreadyCreated { table, id } => {
                ExError::new(ExErrorKind::InvalidState)
                    .with_op("create")
                    .with_entity(table)
                    .with_entity_id(id)
                    .with_message(message)
            }

            PaladinError::RecordNotCreated { table, op } => {
                ExError::new(ExErrorKind::InvalidState)
                    .with_op(op)
                    .with_entity(table)
                    .with_message(message)
            }

            PaladinError::MissingFilters { table } => ExError::new(ExErrorKind::InvalidState)
                .with_op("delete_where")
                .with_entity(table)
                .with_message(message),

            PaladinError::InvalidIdentifier { .. } | PaladinError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            PaladinError::MissingColumn { table, .. } => ExError::new(ExErrorKind::NotFound)
                .with_op("from_row")
                .with_entity(table)
                .with_message(message),

            PaladinError::ColumnType { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("from_row")
                .with_message(message),

            PaladinError::PathNotFound { .. } => {
                ExError::new(ExErrorKind::NotFound).with_message(message)
            }

            PaladinError::NotADirectory { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            PaladinError::FileExists { .. } => {
                ExError::new(ExErrorKind::AlreadyExists).with_message(message)
            }

            PaladinError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),

            PaladinError::CommandFailed { output, .. } => ExError::new(ExErrorKind::Command)
                .with_op("execute")
                .with_message(if output.is_empty() {
                    message
                } else {
                    format!("{}\n{}", message, output)
                }),

            PaladinError::Http { .. } | PaladinError::HttpStatus { .. } => {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("http")
                    .with_message(message)
            }

            PaladinError::HttpTimeout { .. } => ExError::new(ExErrorKind::Timeout)
                .with_op("http")
                .with_message(message),

            PaladinError::Config { .. } => ExError::new(ExErrorKind::Config).with_message(message),

            PaladinError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Convert an I/O error on `path` into the canonical error
pub fn io_error(path: impl AsRef<std::path::Path>, err: std::io::Error) -> ExError {
    let path = path.as_ref().display().to_string();
    match err.kind() {
        std::io::ErrorKind::NotFound => PaladinError::PathNotFound { path }.into(),
        std::io::ErrorKind::AlreadyExists => PaladinError::FileExists { path }.into(),
        _ => PaladinError::Io {
            path,
            message: err.to_string(),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_op_and_table() {
        let err: ExError = PaladinError::RecordNotCreated {
            table: "users".to_string(),
            op: "save".to_string(),
        }
        .into();

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_INVALID_STATE] in operation 'save'"));
        assert!(rendered.contains("(table: users)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);

        let source = std::error::Error::source(&outer).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("[ERR_PERSISTENCE]: disk I/O error"));
    }

    #[test]
    fn test_io_error_maps_not_found() {
        let err = io_error(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }
}
