//! Stat-card figures and display formatting.

use serde::Serialize;

use crate::{
    models::{LlmLogEntry, Snapshot},
    series::{format_local_time, series, DRIFT_PSI},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_requests: usize,
    pub active_alerts: usize,
    /// Any alert at all, resolved or not.
    pub highlight_alerts: bool,
    pub avg_llm_cost_usd: Option<f64>,
    pub avg_llm_cost: String,
    pub drift_detection: &'static str,
}

impl DashboardSummary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let avg_llm_cost_usd = if snapshot.llm_logs.is_empty() {
            None
        } else {
            let total: f64 = snapshot.llm_logs.iter().map(|log| log.cost_usd).sum();
            Some(total / snapshot.llm_logs.len() as f64)
        };

        let drift_active = series(&snapshot.metrics, DRIFT_PSI).next().is_some();

        Self {
            total_requests: snapshot.metrics.len(),
            active_alerts: snapshot.alerts.iter().filter(|a| !a.resolved).count(),
            highlight_alerts: !snapshot.alerts.is_empty(),
            avg_llm_cost_usd,
            avg_llm_cost: avg_llm_cost_usd.map_or_else(|| "-".to_string(), format_cost),
            drift_detection: if drift_active { "Active" } else { "No Data" },
        }
    }
}

/// A row of the recent LLM transactions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmLogRow {
    pub id: String,
    pub time: String,
    pub application_name: String,
    pub latency: String,
    pub tokens_used: u64,
    pub cost: String,
}

impl From<&LlmLogEntry> for LlmLogRow {
    fn from(entry: &LlmLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            time: format_local_time(&entry.timestamp),
            application_name: entry.application_name.clone(),
            latency: format_latency(entry.latency_ms),
            tokens_used: entry.tokens_used,
            cost: format_cost(entry.cost_usd),
        }
    }
}

pub fn llm_log_rows(snapshot: &Snapshot) -> Vec<LlmLogRow> {
    snapshot.llm_logs.iter().map(LlmLogRow::from).collect()
}

pub fn format_cost(cost_usd: f64) -> String {
    format!("${:.4}", cost_usd)
}

pub fn format_latency(latency_ms: u64) -> String {
    format!("{}ms", latency_ms)
}
