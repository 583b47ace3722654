// File: watchtower/src/health/probes.rs
use super::types::HealthCheckResult;
use crate::errors::ProbeError;
use anyhow::Result;
use futures::future::BoxFuture;
use reqwest::Client as HttpClient;
use std::time::{Duration, Instant};
use tracing::debug;

/// A single timed check of one external service.
///
/// `check` must never fail: every transport or protocol problem is folded
/// into the returned result.
pub trait HealthProbe: Send + Sync {
    fn service(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn check(&self) -> BoxFuture<'_, HealthCheckResult>;
}

/// Map an HTTP status to a result: <400 success, 4xx warning, 5xx error
pub fn classify_status(service: &str, status: u16, latency_ms: u64) -> HealthCheckResult {
    if status < 400 {
        HealthCheckResult::success(
            service,
            format!("Responded in {}ms (HTTP {})", latency_ms, status),
        )
        .with_latency(latency_ms)
    } else {
        let message = ProbeError::BadStatus {
            service: service.to_string(),
            status,
        }
        .to_string();

        if status < 500 {
            HealthCheckResult::warning(service, message)
        } else {
            HealthCheckResult::error(service, message)
        }
    }
}

pub(crate) fn timeout_result(service: &str, timeout: Duration) -> HealthCheckResult {
    HealthCheckResult::error(
        service,
        ProbeError::Timeout {
            service: service.to_string(),
            timeout_ms: timeout.as_millis(),
        }
        .to_string(),
    )
}

fn transport_error_result(service: &str, timeout: Duration, err: reqwest::Error) -> HealthCheckResult {
    if err.is_timeout() {
        return timeout_result(service, timeout);
    }

    HealthCheckResult::error(
        service,
        ProbeError::Unreachable {
            service: service.to_string(),
            reason: err.to_string(),
        }
        .to_string(),
    )
}

/// Unauthenticated GET against a public base URL
pub struct HttpLivenessProbe {
    service: String,
    url: String,
    timeout: Duration,
    client: HttpClient,
}

impl HttpLivenessProbe {
    pub fn new(service: &str, url: &str, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            service: service.to_string(),
            url: url.to_string(),
            timeout,
            client,
        })
    }
}

impl HealthProbe for HttpLivenessProbe {
    fn service(&self) -> &str {
        &self.service
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn check(&self) -> BoxFuture<'_, HealthCheckResult> {
        Box::pin(async move {
            let started = Instant::now();
            match self.client.get(&self.url).send().await {
                Ok(response) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    debug!("{} answered {} in {}ms", self.url, response.status(), latency_ms);
                    classify_status(&self.service, response.status().as_u16(), latency_ms)
                }
                Err(e) => transport_error_result(&self.service, self.timeout, e),
            }
        })
    }
}

/// GET against base URL + fixed path with an API-key header
pub struct ApiProbe {
    service: String,
    base_url: Option<String>,
    path: String,
    key_header: String,
    api_key: Option<String>,
    timeout: Duration,
    client: HttpClient,
}

impl ApiProbe {
    pub fn new(
        service: &str,
        base_url: Option<String>,
        path: &str,
        key_header: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            service: service.to_string(),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            path: path.to_string(),
            key_header: key_header.to_string(),
            api_key,
            timeout,
            client,
        })
    }
}

impl HealthProbe for ApiProbe {
    fn service(&self) -> &str {
        &self.service
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn check(&self) -> BoxFuture<'_, HealthCheckResult> {
        Box::pin(async move {
            let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
                return HealthCheckResult::warning(&self.service, "API probe not configured")
                    .with_details("missing base URL or API key");
            };

            let url = format!("{}{}", base_url, self.path);
            let started = Instant::now();

            match self
                .client
                .get(&url)
                .header(self.key_header.as_str(), api_key.as_str())
                .send()
                .await
            {
                Ok(response) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    classify_status(&self.service, response.status().as_u16(), latency_ms)
                }
                Err(e) => transport_error_result(&self.service, self.timeout, e),
            }
        })
    }
}
