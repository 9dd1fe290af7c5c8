use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::models::MetricPoint;

pub const DRIFT_PSI: &str = "drift_psi";
pub const RISK_SCORE: &str = "risk_score";

/// One chart-ready point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: String,
    pub value: f64,
    pub name: String,
}

impl From<&MetricPoint> for SeriesPoint {
    fn from(point: &MetricPoint) -> Self {
        Self {
            time: format_local_time(&point.timestamp),
            value: point.value,
            name: point.entity_name.clone(),
        }
    }
}

/// Wall-clock time in the local zone, `HH:MM:SS`.
pub fn format_local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Points for `metric_name`, oldest first.
///
/// The backend returns metrics newest first, so the matching records are
/// walked back to front. The iterator borrows `metrics` and can be cloned to
/// restart it.
pub fn series<'a>(
    metrics: &'a [MetricPoint],
    metric_name: &'a str,
) -> impl Iterator<Item = SeriesPoint> + Clone + 'a {
    metrics
        .iter()
        .rev()
        .filter(move |point| point.metric_name == metric_name)
        .map(SeriesPoint::from)
}
