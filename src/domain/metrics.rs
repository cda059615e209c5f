// Operational metrics domain models
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default)]
    pub privacy_audits: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            requests: 0,
            cpu: "0%".to_string(),
            memory: "0".to_string(),
            privacy_audits: 0,
        }
    }
}

/// A metrics reading together with the poll tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub metrics: Metrics,
    pub fetched_at: Option<DateTime<Utc>>,
    pub tick: u64,
}

impl MetricsSnapshot {
    pub fn new(metrics: Metrics, tick: u64) -> Self {
        Self {
            metrics,
            fetched_at: Some(Utc::now()),
            tick,
        }
    }
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            metrics: Metrics::default(),
            fetched_at: None,
            tick: 0,
        }
    }
}
