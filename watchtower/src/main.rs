// File: watchtower/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use watchtower::health::{build_probes, HealthMonitor};
use watchtower::log_store::LogStore;
use watchtower::scheduler::{SyncJob, SyncJobScheduler};
use watchtower::services::{HttpSyncPipeline, WebhookAlertNotifier};
use watchtower::signature::SignatureVerifier;
use watchtower::web::{start_web_server, AppState};
use watchtower::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("watchtower=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Watchtower operational monitor");

    // Load configuration
    let config_dir = std::env::var("WATCHTOWER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config_manager = ConfigManager::new(&config_dir).await?;
    let config = config_manager.get_current_config();

    let log_store = Arc::new(LogStore::new());

    // Alert notifier
    let notifier = Arc::new(WebhookAlertNotifier::new(
        config.alerts.webhook_url.clone(),
        config.alerts.recipient.clone(),
        config.secrets.alert_token.clone(),
    )?);
    if notifier.is_enabled() {
        info!("Alert webhook configured: {}", notifier.get_webhook_url());
    } else {
        warn!("⚠️  No alerts.webhook_url configured - health alerts will only be logged");
    }

    // Health monitor
    let alert_cooldown = config.alert_cooldown()?;
    let probes = build_probes(&config)?;
    let health_monitor = Arc::new(HealthMonitor::new(
        probes,
        log_store.clone(),
        notifier,
        alert_cooldown,
        config.check_interval(),
    ));
    let monitor_task = health_monitor.clone().start();
    info!(
        "Health monitor started: {} probes every {}s",
        health_monitor.probe_count(),
        config.check_interval_seconds
    );

    // Sync job and its daily trigger
    let pipeline = Arc::new(HttpSyncPipeline::new(
        config.sync.base_url.clone(),
        config.secrets.sync_api_key.clone(),
    )?);
    let sync_job = SyncJob::new(pipeline);
    let scheduler = Arc::new(
        SyncJobScheduler::new(sync_job.clone(), &config.sync.schedule, &config.sync.timezone)
            .await?,
    );
    if config.sync.enabled {
        scheduler.start().await?;
    } else {
        warn!("Scheduled sync disabled (sync.enabled = false); manual runs remain available");
    }

    // Webhook signature gate
    let mut verifier = SignatureVerifier::new(config.secrets.webhook_secret.clone());
    if let Some(max_age) = config.webhook.max_timestamp_age_seconds {
        verifier = verifier.with_max_timestamp_age(Duration::from_secs(max_age));
    }

    let state = AppState::new(
        config.clone(),
        log_store,
        health_monitor,
        sync_job,
        Arc::new(verifier),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    start_web_server(state, shutdown).await?;

    if let Err(e) = scheduler.stop().await {
        error!("Failed to stop sync scheduler: {}", e);
    }
    monitor_task.abort();
    info!("Watchtower stopped");

    Ok(())
}
