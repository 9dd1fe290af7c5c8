use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub metric_name: String,
    pub entity_name: String,
    pub value: f64,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub message: String,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmLogEntry {
    pub id: Uuid,
    pub application_name: String,
    pub latency_ms: u64,
    pub tokens_used: u64,
    pub cost_usd: f64,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Latest mirror of the backend's metrics, alerts and LLM transactions, in
/// the order the backend returned them (newest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub metrics: Vec<MetricPoint>,
    pub alerts: Vec<Alert>,
    pub llm_logs: Vec<LlmLogEntry>,
}

/// What the poller publishes to its subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub snapshot: Snapshot,
    /// True until the first refresh cycle settles.
    pub loading: bool,
    pub last_settled: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            snapshot: Snapshot::default(),
            loading: true,
            last_settled: None,
        }
    }
}

/// ISO-8601 timestamps as the backend emits them.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, with offset) and naive
/// `2024-01-01T00:00:00.123456`, which is read as UTC. Serializes as RFC 3339.
pub mod iso_timestamp {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
    }
}
