//! Health monitoring module
//!
//! Probes the public site and the payment provider API, feeds the
//! [`LogStore`](crate::log_store::LogStore) and throttles alerts.

pub mod monitor;
pub mod probes;
pub mod types;

pub use monitor::HealthMonitor;
pub use probes::{classify_status, ApiProbe, HealthProbe, HttpLivenessProbe};
pub use types::{CheckStatus, HealthCheckResult};

use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Build the probe set described by the configuration.
///
/// The liveness probe is only registered when a URL is configured; the API
/// probe is always registered and reports a warning while unconfigured.
pub fn build_probes(config: &Config) -> Result<Vec<Arc<dyn HealthProbe>>> {
    let mut probes: Vec<Arc<dyn HealthProbe>> = Vec::new();
    let probe_config = &config.probes;

    match &probe_config.liveness_url {
        Some(url) => probes.push(Arc::new(HttpLivenessProbe::new(
            &probe_config.liveness_service,
            url,
            Duration::from_secs(probe_config.liveness_timeout_seconds),
        )?)),
        None => warn!("No probes.liveness_url configured, liveness probe disabled"),
    }

    probes.push(Arc::new(ApiProbe::new(
        &probe_config.api_service,
        probe_config.api_base_url.clone(),
        &probe_config.api_path,
        &probe_config.api_key_header,
        config.secrets.api_probe_key.clone(),
        Duration::from_secs(probe_config.api_timeout_seconds),
    )?));

    Ok(probes)
}
