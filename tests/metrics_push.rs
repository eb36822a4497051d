use axum::http::StatusCode;
use evaluation_coordinator::domain::WorkflowMetrics;
use evaluation_coordinator::MetricsBackend;
use std::time::Duration;
use tokio::time::sleep;

mod common;

#[tokio::test]
async fn push_once_delivers_exposition() {
    // ---
    let collector = common::FakeCollector::start(StatusCode::NO_CONTENT).await;
    let state = common::test_state(MetricsBackend::Prometheus, &collector.write_url());
    state.metrics().record_evaluation_started("journey-1");
    state.metrics().record_workflow_duration("failed", 45.0);

    common::pusher(&state)
        .push_once(state.metrics().as_ref())
        .await
        .expect("push accepted");

    let received = collector.received();
    assert_eq!(received.len(), 1);

    let push = &received[0];
    assert_eq!(push.service_name.as_deref(), Some("evaluation-coordinator"));
    assert!(push
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/plain")));
    assert!(push
        .body
        .contains(r#"evaluation_coordinator_evaluations_started{journey_id="journey-1"} 1"#));
    assert!(push.body.contains(
        r#"evaluation_coordinator_workflow_duration_seconds_bucket{status="failed",le="30"} 0"#
    ));
}

#[tokio::test]
async fn push_once_fails_on_rejection() {
    // ---
    let collector = common::FakeCollector::start(StatusCode::SERVICE_UNAVAILABLE).await;
    let state = common::test_state(MetricsBackend::Prometheus, &collector.write_url());

    let err = common::pusher(&state)
        .push_once(state.metrics().as_ref())
        .await
        .expect_err("collector rejects pushes");

    assert!(err.to_string().contains("503"), "unexpected error: {err}");
    assert_eq!(collector.received().len(), 1);
}

#[tokio::test]
async fn push_once_fails_when_collector_is_down() {
    // ---
    // Nothing listens on the discard port.
    let state = common::test_state(MetricsBackend::Prometheus, "http://127.0.0.1:9/api/v1/write");

    let result = common::pusher(&state)
        .push_once(state.metrics().as_ref())
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn spawned_pusher_pushes_periodically() {
    // ---
    let collector = common::FakeCollector::start(StatusCode::OK).await;
    let state = common::test_state(MetricsBackend::Prometheus, &collector.write_url());
    state.metrics().record_step_failure("fetch", "http_500");

    let task = common::pusher(&state).spawn(state.metrics().clone());

    // Interval is one second and the first push waits a full interval.
    sleep(Duration::from_millis(2500)).await;
    task.abort();

    let received = collector.received();
    assert!(received.len() >= 2, "got {} pushes", received.len());
    let failures = concat!(
        "evaluation_coordinator_step_failures_total",
        r#"{error_type="http_500",step_type="fetch"} 1"#
    );
    assert!(received.iter().all(|p| p.body.contains(failures)));
}
