use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge_vec,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGaugeVec, TextEncoder,
};
use std::time::Instant;

use crate::{client::Resource, error::FetchError, Result};

lazy_static! {
    // Poll loop metrics
    pub static ref REFRESH_CYCLES: IntCounter = register_int_counter!(
        "dashboard_refresh_cycles_total",
        "Total number of refresh cycles that settled"
    ).unwrap();

    pub static ref REFRESH_SKIPPED: IntCounter = register_int_counter!(
        "dashboard_refresh_skipped_total",
        "Refreshes skipped because another cycle was in flight"
    ).unwrap();

    pub static ref REFRESH_DURATION: Histogram = register_histogram!(
        "dashboard_refresh_duration_seconds",
        "Time for all three fetches of a cycle to settle",
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]
    ).unwrap();

    // Per-resource metrics
    pub static ref FETCH_FAILURES: IntCounterVec = register_int_counter_vec!(
        "dashboard_fetch_failures_total",
        "Fetches that left the previous slice in place",
        &["resource", "kind"]
    ).unwrap();

    pub static ref SNAPSHOT_RECORDS: IntGaugeVec = register_int_gauge_vec!(
        "dashboard_snapshot_records",
        "Records currently held per snapshot slice",
        &["resource"]
    ).unwrap();
}

pub fn init_metrics() {
    for resource in Resource::ALL {
        SNAPSHOT_RECORDS.with_label_values(&[resource.label()]).set(0);
    }
}

pub struct RefreshTimer {
    start: Instant,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        REFRESH_DURATION.observe(self.start.elapsed().as_secs_f64());
    }
}

pub fn record_cycle() {
    REFRESH_CYCLES.inc();
}

pub fn record_skipped() {
    REFRESH_SKIPPED.inc();
}

pub fn record_fetch_failure(resource: Resource, err: &FetchError) {
    FETCH_FAILURES
        .with_label_values(&[resource.label(), err.kind()])
        .inc();
}

pub fn set_snapshot_records(resource: Resource, count: usize) {
    SNAPSHOT_RECORDS
        .with_label_values(&[resource.label()])
        .set(count as i64);
}

/// Renders every registered collector in the Prometheus text format.
pub fn gather_text() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::DashboardError::Internal(e.to_string()))
}
