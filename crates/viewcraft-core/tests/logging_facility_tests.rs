#![allow(clippy::unwrap_used, clippy::expect_used)]

use viewcraft_core::errors::{ExErrorKind, ViewEditorError};
use viewcraft_core::logging_facility::test_capture::init_test_capture;
use viewcraft_core::{log_op_end, log_op_error, log_op_start};
use viewcraft_core::{ViewDefinition, ViewEditorPart, ViewEditorService};
use viewcraft_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    log_op_error!(op_name, ViewEditorError::ReadOnly, duration_ms = 1);

    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field("err.code"), Some("ERR_READ_ONLY"));
    assert_eq!(
        error_event.field("err.kind"),
        Some(format!("{:?}", ExErrorKind::ReadOnly).as_str())
    );
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_fire_view_state_has_changed_logs_boundary() {
    // GIVEN an editor on an empty view
    let capture = init_test_capture();
    let mut service = ViewEditorService::default();
    service.set_editor_view(Some(ViewDefinition::new("v")), ViewEditorPart::Editor);

    // WHEN a command is dispatched
    let cmd = viewcraft_core::commands::factory::create_add_sources_command(
        Some(vec!["logging/unique_table".to_string()]),
        Some("logging-add"),
    );
    service
        .fire_view_state_has_changed(ViewEditorPart::Editor, cmd)
        .unwrap();

    // THEN the operation logged its start with the command kind, and its end
    let events = capture.events_for_op("fire_view_state_has_changed");
    assert!(events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)
        && e.field("command_kind") == Some("AddSourcesCommand")));
    capture.assert_event_exists("fire_view_state_has_changed", EVENT_END);
}

#[test]
fn test_rejected_undo_logs_error_code() {
    // GIVEN a read-only editor
    let capture = init_test_capture();
    let mut service = ViewEditorService::default();
    service.set_editor_view(Some(ViewDefinition::new("v")), ViewEditorPart::Editor);
    service.set_read_only(true);

    // WHEN undo is attempted
    let err = service.undo(ViewEditorPart::History).unwrap_err();

    // THEN it fails and the failure is logged with its code
    assert_eq!(err, ViewEditorError::ReadOnly);
    let logged = capture.count_events(|e| {
        e.op.as_deref() == Some("undo")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err.code") == Some("ERR_READ_ONLY")
    });
    assert!(logged >= 1);
}
