//! HTTP access to the observability API.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::{DashboardConfig, FetchLimits},
    error::FetchError,
    models::{Alert, LlmLogEntry, MetricPoint},
    DashboardError, Result,
};

/// The three backend collections mirrored into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Metrics,
    Alerts,
    LlmLogs,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Metrics, Resource::Alerts, Resource::LlmLogs];

    pub fn path(self) -> &'static str {
        match self {
            Resource::Metrics => "/metrics",
            Resource::Alerts => "/alerts",
            Resource::LlmLogs => "/events/llm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Metrics => "metrics",
            Resource::Alerts => "alerts",
            Resource::LlmLogs => "llm_logs",
        }
    }
}

/// Source of the three snapshot slices.
///
/// Each call is independent; an error from one must say nothing about the others.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_metrics(&self) -> std::result::Result<Vec<MetricPoint>, FetchError>;
    async fn fetch_alerts(&self) -> std::result::Result<Vec<Alert>, FetchError>;
    async fn fetch_llm_logs(&self) -> std::result::Result<Vec<LlmLogEntry>, FetchError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
    limits: FetchLimits,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = create_client(config.request_timeout)?;
        Ok(Self::with_client(client, &config.api_url, config.limits))
    }

    pub fn with_client(client: Client, base_url: &Url, limits: FetchLimits) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            limits,
        }
    }

    fn limit_for(&self, resource: Resource) -> usize {
        match resource {
            Resource::Metrics => self.limits.metrics,
            Resource::Alerts => self.limits.alerts,
            Resource::LlmLogs => self.limits.llm_logs,
        }
    }

    /// GETs one collection and validates it against `T`.
    ///
    /// Any record that fails to deserialize rejects the whole body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> std::result::Result<Vec<T>, FetchError> {
        let url = format!("{}{}", self.base_url, resource.path());
        let limit = self.limit_for(resource);
        debug!(resource = resource.label(), %url, limit, "fetching");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read body: {}", e)))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_metrics(&self) -> std::result::Result<Vec<MetricPoint>, FetchError> {
        self.fetch(Resource::Metrics).await
    }

    async fn fetch_alerts(&self) -> std::result::Result<Vec<Alert>, FetchError> {
        self.fetch(Resource::Alerts).await
    }

    async fn fetch_llm_logs(&self) -> std::result::Result<Vec<LlmLogEntry>, FetchError> {
        self.fetch(Resource::LlmLogs).await
    }
}

pub fn create_client(request_timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(5)))
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(format!("observability-dashboard/{}", env!("CARGO_PKG_VERSION")))
        .use_rustls_tls()
        .build()
        .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Metrics.path(), "/metrics");
        assert_eq!(Resource::Alerts.path(), "/alerts");
        assert_eq!(Resource::LlmLogs.path(), "/events/llm");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = create_client(Duration::from_secs(1)).unwrap();
        let base = Url::parse("http://127.0.0.1:8000/").unwrap();
        let backend = HttpBackend::with_client(client, &base, FetchLimits::default());
        assert_eq!(backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(backend.limit_for(Resource::LlmLogs), 20);
    }
}
