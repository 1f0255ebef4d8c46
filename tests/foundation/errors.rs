//! Integration tests for error types

use synthdata_foundation::{
    ColumnId, EntityRef, Error, ErrorContext, ErrorKind, GeneratorSettingId, ProjectId,
    RemoteError, TableId,
};

// =============================================================================
// Kinds and messages
// =============================================================================

#[test]
fn duplicate_id_names_the_entity() {
    let err = Error::duplicate_id(EntityRef::Column(TableId::new(26), ColumnId::new(126)));
    assert_eq!(err.to_string(), "duplicate id: Column(126) in Table(26)");
}

#[test]
fn dangling_reference_names_all_ids() {
    let err = Error::dangling_reference(
        TableId::new(26),
        ColumnId::new(126),
        GeneratorSettingId::new(103),
    );
    let msg = err.to_string();
    assert!(msg.contains("Table(26)"));
    assert!(msg.contains("Column(126)"));
    assert!(msg.contains("GeneratorSetting(103)"));
}

#[test]
fn invalid_null_frequency_keeps_value() {
    let err = Error::invalid_null_frequency(GeneratorSettingId::new(1), 1.5);
    match err.kind {
        ErrorKind::InvalidNullFrequency { setting, value } => {
            assert_eq!(setting, GeneratorSettingId::new(1));
            assert!((value - 1.5).abs() < f64::EPSILON);
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn no_active_project_message() {
    assert_eq!(Error::no_active_project().to_string(), "no active project");
}

#[test]
fn every_kind_has_a_constructor() {
    let errors = [
        Error::duplicate_id(EntityRef::Table(TableId::new(26))),
        Error::dangling_reference(TableId::new(26), ColumnId::new(126), GeneratorSettingId::new(1)),
        Error::invalid_null_frequency(GeneratorSettingId::new(1), -0.5),
        Error::unknown_column_type("blob"),
        Error::no_active_project(),
        Error::from(RemoteError::Transport("down".to_string())),
    ];
    let mut seen = Vec::new();
    for err in &errors {
        // No wildcard: a new kind must be produced above.
        let name = match &err.kind {
            ErrorKind::DuplicateId(_) => "duplicate",
            ErrorKind::DanglingGeneratorReference { .. } => "dangling",
            ErrorKind::InvalidNullFrequency { .. } => "null_frequency",
            ErrorKind::UnknownColumnType(_) => "column_type",
            ErrorKind::NoActiveProject => "no_project",
            ErrorKind::Remote(_) => "remote",
        };
        seen.push(name);
    }
    seen.dedup();
    assert_eq!(seen.len(), errors.len());
}

// =============================================================================
// Remote errors
// =============================================================================

#[test]
fn remote_error_converts() {
    let err: Error = RemoteError::NotFound("Project(9)".to_string()).into();
    assert_eq!(
        err.as_remote(),
        Some(&RemoteError::NotFound("Project(9)".to_string()))
    );
    assert_eq!(err.to_string(), "remote error: not found: Project(9)");
}

#[test]
fn as_remote_is_none_for_local_errors() {
    assert!(Error::no_active_project().as_remote().is_none());
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_is_attached() {
    let err = Error::from(RemoteError::Transport("timeout".to_string())).with_context(
        ErrorContext::new()
            .with_operation("load_project")
            .with_project(ProjectId::new(3)),
    );
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.operation.as_deref(), Some("load_project"));
    assert_eq!(context.project, Some(ProjectId::new(3)));
    assert_eq!(context.to_string(), "in load_project of Project(3)");
}

#[test]
fn context_display_without_operation() {
    let context = ErrorContext::new().with_project(ProjectId::new(3));
    assert_eq!(context.to_string(), "of Project(3)");
}
