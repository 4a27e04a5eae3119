// Boundary logging of engine operations
//
// Kept in its own test binary: the capture buffer is process-global and
// these assertions count events by op name.

mod common;

use common::*;
use navdeck_core::batch::BatchOperation;
use navdeck_core::logging_facility::test_capture::init_test_capture;
use navdeck_core::model::EntityKind;
use navdeck_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use navdeck_engine::commands::{batch::batch_apply, lifecycle};

#[test]
fn test_engine_operations_log_one_boundary_pair() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let (_g, s) = group_with_sites(&mut conn, "G", &["A", "B"]);

    // a batch logs once, not once per id
    batch_apply(
        OWNER,
        EntityKind::Site,
        &BatchOperation::Delete,
        &ids(&s),
        &mut conn,
    )
    .unwrap();

    let batch_events = capture.events_for_op("batch_apply");
    let starts = batch_events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends = batch_events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .count();
    assert_eq!((starts, ends), (1, 1));
    assert!(capture.events_for_op("delete_site").is_empty());

    let end = batch_events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.field("succeeded"), Some("2"));
    assert!(end.field("duration_ms").is_some());
    assert_eq!(
        end.component.as_deref(),
        Some("navdeck_engine::commands::batch")
    );

    // a failing single-item call ends with the error code
    lifecycle::permanently_delete_group(OWNER, 404, &mut conn).unwrap_err();

    let failed = capture.events_for_op("permanently_delete_group");
    let error_event = failed
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(error_event.field("err.code"), Some("ERR_NOT_FOUND"));
    assert!(!failed
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END)));
}
