// File: watchtower/src/config/mod.rs
pub mod manager;
pub mod secrets;

use crate::constants::{alerts, defaults, http};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use manager::ConfigManager;
pub use secrets::{Secrets, SecretsLoader};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown_minutes: i64,
    #[serde(default)]
    pub probes: ProbesConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    // Populated from secrets.toml and the environment, never from main.toml
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbesConfig {
    pub liveness_url: Option<String>,
    #[serde(default = "default_liveness_service")]
    pub liveness_service: String,
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_seconds: u64,
    pub api_base_url: Option<String>,
    #[serde(default = "default_api_service")]
    pub api_service: String,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default = "default_api_timeout")]
    pub api_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 5-field cron: minute hour day month dayofweek
    #[serde(default = "default_sync_schedule")]
    pub schedule: String,
    #[serde(default = "default_sync_timezone")]
    pub timezone: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlertsConfig {
    #[serde(default)]
    pub webhook_url: String,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebhookConfig {
    /// Admit unsigned webhooks outside production. Ignored in production.
    #[serde(default)]
    pub allow_unsigned_in_development: bool,
    /// Reject signatures whose timestamp drifts further than this from now
    pub max_timestamp_age_seconds: Option<u64>,
}

impl Config {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    /// Per-service alert cooldown. Fails for negative values and for values
    /// too large to represent as a duration.
    pub fn alert_cooldown(&self) -> Result<chrono::Duration, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "alert_cooldown_minutes".to_string(),
            reason: reason.to_string(),
        };

        if self.alert_cooldown_minutes < 0 {
            return Err(invalid("must not be negative"));
        }
        chrono::Duration::try_minutes(self.alert_cooldown_minutes)
            .ok_or_else(|| invalid("too large to represent as a duration"))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Unsigned webhooks are only ever admitted outside production
    pub fn unsigned_webhooks_allowed(&self) -> bool {
        !self.is_production() && self.webhook.allow_unsigned_in_development
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            check_interval_seconds: default_check_interval(),
            alert_cooldown_minutes: default_alert_cooldown(),
            probes: ProbesConfig::default(),
            sync: SyncConfig::default(),
            alerts: AlertsConfig::default(),
            webhook: WebhookConfig::default(),
            secrets: Secrets::default(),
        }
    }
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            liveness_url: None,
            liveness_service: default_liveness_service(),
            liveness_timeout_seconds: default_liveness_timeout(),
            api_base_url: None,
            api_service: default_api_service(),
            api_path: default_api_path(),
            api_key_header: default_api_key_header(),
            api_timeout_seconds: default_api_timeout(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_sync_schedule(),
            timezone: default_sync_timezone(),
            base_url: None,
        }
    }
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_check_interval() -> u64 {
    defaults::HEALTH_CHECK_INTERVAL_SECONDS
}

fn default_alert_cooldown() -> i64 {
    alerts::COOLDOWN_MINUTES
}

fn default_liveness_service() -> String {
    defaults::LIVENESS_SERVICE_NAME.to_string()
}

fn default_liveness_timeout() -> u64 {
    http::LIVENESS_PROBE_TIMEOUT.as_secs()
}

fn default_api_service() -> String {
    defaults::API_SERVICE_NAME.to_string()
}

fn default_api_path() -> String {
    defaults::API_PROBE_PATH.to_string()
}

fn default_api_key_header() -> String {
    defaults::API_PROBE_KEY_HEADER.to_string()
}

fn default_api_timeout() -> u64 {
    http::API_PROBE_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

fn default_sync_schedule() -> String {
    defaults::SYNC_SCHEDULE.to_string()
}

fn default_sync_timezone() -> String {
    defaults::SYNC_TIMEZONE.to_string()
}
