//! Health probes with scripted behavior

use futures::future::BoxFuture;
use std::time::Duration;
use watchtower::health::{CheckStatus, HealthCheckResult, HealthProbe};

/// Returns the same status on every check
pub struct StaticProbe {
    service: String,
    status: CheckStatus,
    message: String,
}

impl StaticProbe {
    pub fn new(service: &str, status: CheckStatus, message: &str) -> Self {
        Self {
            service: service.to_string(),
            status,
            message: message.to_string(),
        }
    }

    pub fn healthy(service: &str) -> Self {
        Self::new(service, CheckStatus::Success, "ok")
    }

    pub fn failing(service: &str) -> Self {
        Self::new(service, CheckStatus::Error, "connection refused")
    }
}

impl HealthProbe for StaticProbe {
    fn service(&self) -> &str {
        &self.service
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn check(&self) -> BoxFuture<'_, HealthCheckResult> {
        Box::pin(async move { HealthCheckResult::new(&self.service, self.status, self.message.clone()) })
    }
}

/// Takes `delay` to answer, which may exceed its own `timeout`
pub struct SlowProbe {
    service: String,
    delay: Duration,
    timeout: Duration,
}

impl SlowProbe {
    pub fn new(service: &str, delay: Duration, timeout: Duration) -> Self {
        Self {
            service: service.to_string(),
            delay,
            timeout,
        }
    }
}

impl HealthProbe for SlowProbe {
    fn service(&self) -> &str {
        &self.service
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn check(&self) -> BoxFuture<'_, HealthCheckResult> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            HealthCheckResult::success(&self.service, "eventually answered")
        })
    }
}

/// Panics inside the check
pub struct PanickingProbe {
    service: String,
}

impl PanickingProbe {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }
}

impl HealthProbe for PanickingProbe {
    fn service(&self) -> &str {
        &self.service
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn check(&self) -> BoxFuture<'_, HealthCheckResult> {
        Box::pin(async move {
            if !self.service.is_empty() {
                panic!("probe for {} exploded", self.service);
            }
            HealthCheckResult::error(&self.service, "unnamed probe")
        })
    }
}
