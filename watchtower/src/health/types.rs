//! Health check result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Warning,
    Error,
}

/// Outcome of a single probe. Built once by the probe and never mutated
/// after it is handed to the monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCheckResult {
    pub service: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn new(service: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            status,
            message: message.into(),
            details: None,
            latency_ms: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success(service: &str, message: impl Into<String>) -> Self {
        Self::new(service, CheckStatus::Success, message)
    }

    pub fn warning(service: &str, message: impl Into<String>) -> Self {
        Self::new(service, CheckStatus::Warning, message)
    }

    pub fn error(service: &str, message: impl Into<String>) -> Self {
        Self::new(service, CheckStatus::Error, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == CheckStatus::Error
    }
}
