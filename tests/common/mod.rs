#![allow(dead_code)]

use std::time::Duration;

use observability_dashboard::{
    client::{create_client, HttpBackend},
    config::FetchLimits,
};
use reqwest::Url;
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn backend_for(server: &MockServer) -> HttpBackend {
    let client = create_client(Duration::from_secs(2)).expect("client");
    let base = Url::parse(&server.uri()).expect("mock server uri");
    HttpBackend::with_client(client, &base, FetchLimits::default())
}

pub fn metrics_body() -> Value {
    // Newest first, as the API orders by timestamp desc.
    json!([
        {
            "timestamp": "2024-01-01T00:10:00.000000",
            "entity_name": "fraud-model",
            "metric_name": "drift_psi",
            "value": 0.31
        },
        {
            "timestamp": "2024-01-01T00:05:00.000000",
            "entity_name": "fraud-model",
            "metric_name": "risk_score",
            "value": 0.72
        },
        {
            "timestamp": "2024-01-01T00:00:00.000000",
            "entity_name": "fraud-model",
            "metric_name": "drift_psi",
            "value": 0.12
        }
    ])
}

pub fn alerts_body() -> Value {
    json!([
        {
            "timestamp": "2024-01-01T00:10:01",
            "severity": "high",
            "message": "PSI 0.31 exceeds threshold for fraud-model",
            "resolved": false
        }
    ])
}

pub fn llm_logs_body() -> Value {
    json!([
        {
            "id": "0b9d2c4e-5a7f-4f3e-9e61-2d3c4b5a6f70",
            "application_name": "support-bot",
            "prompt": "Where is my order?",
            "response": "It shipped yesterday.",
            "latency_ms": 812,
            "tokens_used": 143,
            "cost_usd": 0.00286,
            "timestamp": "2024-01-01T00:09:30.120000"
        }
    ])
}
