use std::env;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::{DashboardError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PORT: u16 = 3000;

/// `limit` query values sent to the three backend endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub metrics: usize,
    pub alerts: usize,
    pub llm_logs: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            metrics: 100,
            alerts: 50,
            llm_logs: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(DashboardError::Config(format!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: Url,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub limits: FetchLimits,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            limits: FetchLimits::default(),
            port: DEFAULT_PORT,
            log_format: LogFormat::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = match lookup("API_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| {
                DashboardError::Config(format!("API_URL '{}' is not a valid URL: {}", raw, e))
            })?,
            None => defaults.api_url,
        };
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "API_URL must use http or https, got '{}'",
                api_url.scheme()
            )));
        }

        let refresh_ms = parse_positive(&lookup, "REFRESH_INTERVAL_MS", DEFAULT_REFRESH_INTERVAL_MS)?;
        let timeout_ms = parse_positive(&lookup, "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let limits = FetchLimits {
            metrics: parse_positive(&lookup, "METRICS_LIMIT", defaults.limits.metrics)?,
            alerts: parse_positive(&lookup, "ALERTS_LIMIT", defaults.limits.alerts)?,
            llm_logs: parse_positive(&lookup, "LLM_LOGS_LIMIT", defaults.limits.llm_logs)?,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                DashboardError::Config(format!("PORT '{}' is invalid: {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.trim().parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            refresh_interval: Duration::from_millis(refresh_ms),
            request_timeout: Duration::from_millis(timeout_ms),
            limits,
            port,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|e| DashboardError::Config(format!("{} '{}' is invalid: {}", key, raw, e)))?;
    if value <= T::default() {
        return Err(DashboardError::Config(format!("{} must be greater than zero", key)));
    }
    Ok(value)
}
