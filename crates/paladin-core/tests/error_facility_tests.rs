use paladin_core::errors::{ExError, ExErrorKind, PaladinError};

#[test]
fn test_record_already_created_is_invalid_state() {
    let err: ExError = PaladinError::RecordAlreadyCreated {
        table: "users".to_string(),
        id: 7,
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidState);
    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert_eq!(err.op(), Some("create"));
    assert_eq!(err.entity(), Some("users"));
    assert_eq!(err.entity_id(), Some("7"));
}

#[test]
fn test_record_not_created_keeps_operation() {
    let err: ExError = PaladinError::RecordNotCreated {
        table: "users".to_string(),
        op: "delete".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidState);
    assert_eq!(err.op(), Some("delete"));
    assert!(err.message().contains("Cannot delete a new object"));
}

#[test]
fn test_missing_filters_is_invalid_state() {
    let err: ExError = PaladinError::MissingFilters {
        table: "users".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidState);
    assert_eq!(err.op(), Some("delete_where"));
}

#[test]
fn test_command_failure_carries_output() {
    let err: ExError = PaladinError::CommandFailed {
        cmd: "diskpart".to_string(),
        status: 2,
        output: "access denied".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::Command);
    assert!(err.message().contains("status 2"));
    assert!(err.message().contains("access denied"));
}

#[test]
fn test_http_errors_are_external_service() {
    let status: ExError = PaladinError::HttpStatus {
        method: "GET".to_string(),
        url: "http://localhost/".to_string(),
        status: 503,
    }
    .into();
    let timeout: ExError = PaladinError::HttpTimeout {
        method: "GET".to_string(),
        url: "http://localhost/".to_string(),
    }
    .into();

    assert_eq!(status.kind(), ExErrorKind::ExternalService);
    assert_eq!(timeout.kind(), ExErrorKind::Timeout);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidState, "ERR_INVALID_STATE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Config, "ERR_CONFIG"),
        (ExErrorKind::Command, "ERR_COMMAND"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_builder_context_round_trips() {
    let err = ExError::new(ExErrorKind::Persistence)
        .with_op("update")
        .with_entity("notes")
        .with_entity_id(3)
        .with_message("database is locked");

    assert_eq!(err.op(), Some("update"));
    assert_eq!(err.entity(), Some("notes"));
    assert_eq!(err.entity_id(), Some("3"));
    assert_eq!(
        err.to_string(),
        "[ERR_PERSISTENCE] in operation 'update': database is locked (table: notes) (id: 3)"
    );
}
