// File: watchtower/src/health/monitor.rs
use super::probes::{timeout_result, HealthProbe};
use super::types::{CheckStatus, HealthCheckResult};
use crate::errors::ProbeError;
use crate::log_store::{LogStore, LogUpdate};
use crate::services::AlertNotifier;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{timeout, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Periodic fan-out of health probes with per-service alert cooldown.
///
/// One instance is built at process start and shared as an `Arc`; it lives
/// until the process exits.
pub struct HealthMonitor {
    probes: Vec<Arc<dyn HealthProbe>>,
    log_store: Arc<LogStore>,
    notifier: Arc<dyn AlertNotifier>,
    // service -> last dispatched alert. Entries are never pruned.
    alert_cooldowns: Mutex<HashMap<String, DateTime<Utc>>>,
    cooldown: chrono::Duration,
    check_interval: Duration,
}

impl HealthMonitor {
    pub fn new(
        probes: Vec<Arc<dyn HealthProbe>>,
        log_store: Arc<LogStore>,
        notifier: Arc<dyn AlertNotifier>,
        cooldown: chrono::Duration,
        check_interval: Duration,
    ) -> Self {
        Self {
            probes,
            log_store,
            notifier,
            alert_cooldowns: Mutex::new(HashMap::new()),
            cooldown,
            check_interval,
        }
    }

    /// Run every probe concurrently, record the results and alert on errors.
    #[instrument(skip(self), fields(probes = self.probes.len()))]
    pub async fn perform_check(&self) -> Vec<HealthCheckResult> {
        let (services, tasks): (Vec<String>, Vec<_>) = self
            .probes
            .iter()
            .map(|probe| {
                let probe = probe.clone();
                (
                    probe.service().to_string(),
                    tokio::spawn(async move { run_probe(probe).await }),
                )
            })
            .unzip();

        let results: Vec<HealthCheckResult> = services
            .into_iter()
            .zip(join_all(tasks).await)
            .map(|(service, joined)| match joined {
                Ok(result) => result,
                Err(e) => {
                    let message = ProbeError::Crashed {
                        service: service.clone(),
                        reason: e.to_string(),
                    }
                    .to_string();
                    HealthCheckResult::error(&service, message)
                }
            })
            .collect();

        for result in &results {
            self.log_store.add(LogUpdate::from(result)).await;
        }

        for result in results.iter().filter(|r| r.is_error()) {
            self.dispatch_alert(result).await;
        }

        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        info!(
            success = count(CheckStatus::Success),
            warning = count(CheckStatus::Warning),
            error = count(CheckStatus::Error),
            "Health check cycle finished"
        );

        results
    }

    /// Check-and-set of the cooldown entry under one lock. Returns true when
    /// an alert for `service` may be sent at `now`.
    ///
    /// Uses wall-clock deltas; a backwards clock jump can stretch or shorten
    /// the effective window.
    pub async fn should_dispatch_alert(&self, service: &str, now: DateTime<Utc>) -> bool {
        let mut cooldowns = self.alert_cooldowns.lock().await;

        match cooldowns.get(service) {
            Some(last_alert) if now - *last_alert < self.cooldown => {
                debug!(
                    "Alert for {} suppressed, last one sent {}m ago",
                    service,
                    (now - *last_alert).num_minutes()
                );
                false
            }
            _ => {
                cooldowns.insert(service.to_string(), now);
                true
            }
        }
    }

    pub async fn last_alert_at(&self, service: &str) -> Option<DateTime<Utc>> {
        self.alert_cooldowns.lock().await.get(service).copied()
    }

    async fn dispatch_alert(&self, result: &HealthCheckResult) {
        if !self.should_dispatch_alert(&result.service, Utc::now()).await {
            return;
        }

        let message = format!("{} health check failed: {}", result.service, result.message);
        match self.notifier.send_alert(&result.service, &message).await {
            Ok(()) => info!("Alert dispatched for {}", result.service),
            Err(e) => warn!("Failed to send alert for {}: {}", result.service, e),
        }
    }

    /// Check once immediately, then every `check_interval` for the process lifetime.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            "Starting health monitor: {} probes every {}s, alert cooldown {}m",
            self.probes.len(),
            self.check_interval.as_secs(),
            self.cooldown.num_minutes()
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.check_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut check_count = 0u64;

            loop {
                interval.tick().await;
                check_count += 1;

                if check_count % 10 == 0 {
                    info!("Health monitoring cycle #{}", check_count);
                }

                self.perform_check().await;
            }
        })
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }
}

async fn run_probe(probe: Arc<dyn HealthProbe>) -> HealthCheckResult {
    let limit = probe.timeout();
    match timeout(limit, probe.check()).await {
        Ok(result) => result,
        Err(_) => timeout_result(probe.service(), limit),
    }
}
