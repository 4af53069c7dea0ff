#![allow(clippy::unwrap_used, clippy::expect_used)]

use errtree_core::logging_facility::test_capture::init_test_capture;
use errtree_core::logging_facility::{log_error, Log, LogInfo, RequestInfo, Service, TracingLog};
use errtree_core::schema::{EVENT_BAD_ARGUMENT, EVENT_ERROR};
use errtree_core::{e, log_err, ErrorBuilder, Op};
use tracing::Level;

#[test]
fn test_log_err_client_error_is_info() {
    let capture = init_test_capture();
    let op_name = "test_log_err_unique_1";

    let err = e!(404, "order not found", Op::new("load"));
    log_err!(op_name, err);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");

    let event = &events[0];
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.event.as_deref(), Some(EVENT_ERROR));
    assert_eq!(event.field("err.code"), Some("404"));
    assert_eq!(event.field("err.status"), Some("404"));
    assert_eq!(event.message.as_deref(), Some("order not found"));
}

#[test]
fn test_log_err_server_error_is_error() {
    let capture = init_test_capture();
    let op_name = "test_log_err_unique_2";

    let err = e!(503, Op::new("call"));
    log_err!(op_name, err, upstream = "payments");

    capture.assert_event_exists(op_name, EVENT_ERROR);
    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.field("upstream"), Some("payments"));
    assert_eq!(event.field("err.code"), Some("503"));
}

#[test]
fn test_log_err_business_error_is_info() {
    let capture = init_test_capture();
    let op_name = "test_log_err_unique_3";

    let err = e!(50_005, Op::new("load"));
    log_err!(op_name, err);

    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.field("err.status"), Some("400"));
}

#[test]
fn test_bad_argument_warns_with_call_site() {
    let capture = init_test_capture();

    let err = e!("calc failed", 2.5, Op::new("test_bad_argument_unique_4"));
    assert_eq!(err.children().len(), 1);

    let warnings: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| {
            e.event.as_deref() == Some(EVENT_BAD_ARGUMENT) && e.field("value") == Some("2.5")
        })
        .collect();
    assert!(!warnings.is_empty(), "Should have a bad_argument warning");

    let warning = &warnings[0];
    assert_eq!(warning.level, Level::WARN);
    assert_eq!(warning.field("kind"), Some("f64"));
    assert!(warning
        .field("file")
        .unwrap()
        .ends_with("logging_facility_tests.rs"));
}

#[test]
fn test_builder_bad_argument_warns() {
    let capture = init_test_capture();

    let builder = ErrorBuilder::new(vec![
        errtree_core::Arg::from(400),
        errtree_core::Arg::from('x'),
    ]);
    assert_eq!(builder.children().len(), 1);

    let found = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_BAD_ARGUMENT) && e.field("kind") == Some("char")
    });
    assert!(found >= 1);
}

#[test]
fn test_tracing_log_sink_carries_request_info() {
    let capture = init_test_capture();

    let info = LogInfo::new()
        .with_service(&Service("shop".to_string()))
        .with_request(&RequestInfo {
            trace_id: "trace-unique-5".to_string(),
            path: "/orders".to_string(),
            method: "POST".to_string(),
            ..RequestInfo::default()
        });
    let err = e!(500, "db down", Op::new("save"));
    log_error(&TracingLog, &err, &info);
    TracingLog.warn("slow response", &info);

    let events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.field("trace_id") == Some("trace-unique-5"))
        .collect();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].message.as_deref(), Some("db down"));
    assert_eq!(events[0].field("service"), Some("shop"));
    assert_eq!(events[0].field("path"), Some("/orders"));
    assert_eq!(events[1].level, Level::WARN);
}
