//! End-to-end refresh cycles against a mocked observability API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use observability_dashboard::{
    series::{series, DRIFT_PSI},
    FetchError, Poller, RefreshOutcome, ResourceStatus,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use common::{alerts_body, backend_for, llm_logs_body, metrics_body};

async fn mount_ok(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_full_cycle_populates_snapshot() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, "/metrics", metrics_body()).await;
    mount_ok(&mock_server, "/alerts", alerts_body()).await;
    mount_ok(&mock_server, "/events/llm", llm_logs_body()).await;

    let poller = Poller::new(Arc::new(backend_for(&mock_server)));
    assert!(poller.state().loading);

    let outcome = poller.refresh().await;
    let RefreshOutcome::Completed(report) = outcome else {
        panic!("first refresh cannot be skipped");
    };
    assert_eq!(report.metrics, ResourceStatus::Updated(3));
    assert_eq!(report.alerts, ResourceStatus::Updated(1));
    assert_eq!(report.llm_logs, ResourceStatus::Updated(1));

    let state = poller.state();
    assert!(!state.loading);
    assert_eq!(state.snapshot.alerts[0].severity.as_deref(), Some("high"));

    let drift: Vec<f64> = series(&state.snapshot.metrics, DRIFT_PSI)
        .map(|p| p.value)
        .collect();
    assert_eq!(drift, vec![0.12, 0.31]);
}

#[tokio::test]
async fn test_failed_endpoint_keeps_stale_slice() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, "/metrics", metrics_body()).await;
    mount_ok(&mock_server, "/alerts", alerts_body()).await;
    mount_ok(&mock_server, "/events/llm", llm_logs_body()).await;

    let poller = Poller::new(Arc::new(backend_for(&mock_server)));
    poller.refresh().await;
    let before = poller.state().snapshot;

    mock_server.reset().await;
    mount_ok(&mock_server, "/metrics", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/llm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let RefreshOutcome::Completed(report) = poller.refresh().await else {
        panic!("refresh should complete");
    };
    assert_eq!(report.metrics, ResourceStatus::Updated(0));
    assert_eq!(
        report.alerts,
        ResourceStatus::Retained(FetchError::Status { status: 500 })
    );
    assert!(matches!(
        report.llm_logs,
        ResourceStatus::Retained(FetchError::Parse(_))
    ));

    let after = poller.state().snapshot;
    assert!(after.metrics.is_empty());
    assert_eq!(after.alerts, before.alerts);
    assert_eq!(after.llm_logs, before.llm_logs);
}

#[tokio::test]
async fn test_unreachable_api_still_clears_loading() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let poller = Poller::new(Arc::new(backend_for(&mock_server)));
    let mut updates = poller.subscribe();

    poller.start(Duration::from_secs(60)).unwrap();
    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("first cycle settles")
        .unwrap();

    let state = updates.borrow().clone();
    assert!(!state.loading);
    assert!(state.snapshot.metrics.is_empty());
    assert!(state.snapshot.alerts.is_empty());
    assert!(state.snapshot.llm_logs.is_empty());

    poller.stop().await;
    assert!(!poller.is_running());
}
