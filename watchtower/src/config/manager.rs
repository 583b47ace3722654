// File: watchtower/src/config/manager.rs
use super::{Config, SecretsLoader};
use crate::errors::ConfigError;
use crate::scheduler::{parse_timezone, to_six_field_cron};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: &str) -> Result<Self> {
        let config = Self::load_configuration(config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content =
            fs::read_to_string(&main_config_path)
                .await
                .map_err(|e| ConfigError::LoadFailed {
                    path: main_config_path.clone(),
                    reason: e.to_string(),
                })?;

        let mut config: Config =
            toml::from_str(&main_config_content).map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let secrets_path = format!("{}/secrets.toml", config_dir);
        config.secrets = SecretsLoader::load(Path::new(&secrets_path))?
            .with_env_overrides()
            .into_secrets();

        Self::validate(&config)?;
        Self::report_missing_secrets(&config);

        info!(
            "Configuration loaded: environment={:?}, check interval {}s, alert cooldown {}m, sync '{}' ({})",
            config.environment,
            config.check_interval_seconds,
            config.alert_cooldown_minutes,
            config.sync.schedule,
            config.sync.timezone
        );

        Ok(config)
    }

    /// Reject configurations the scheduler or monitor could not run with
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.check_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "check_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        config.alert_cooldown()?;

        if config.probes.liveness_timeout_seconds == 0 || config.probes.api_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probes".to_string(),
                reason: "probe timeouts must be greater than zero".to_string(),
            });
        }

        if config.sync.enabled {
            to_six_field_cron(&config.sync.schedule).map_err(|e| ConfigError::InvalidValue {
                field: "sync.schedule".to_string(),
                reason: e.to_string(),
            })?;

            parse_timezone(&config.sync.timezone).map_err(|e| ConfigError::InvalidValue {
                field: "sync.timezone".to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    // Missing secrets degrade features instead of failing startup
    fn report_missing_secrets(config: &Config) {
        if config.secrets.webhook_secret.is_none() {
            warn!("No webhook secret configured - every signed webhook will be rejected");
        }
        if config.secrets.admin_api_key.is_none() {
            warn!("No admin API key configured - dashboard endpoints will answer 401");
        }
        if config.sync.enabled && config.sync.base_url.is_none() {
            warn!("Sync is enabled but sync.base_url is missing - scheduled runs will fail");
        }
        if config.unsigned_webhooks_allowed() {
            warn!("Unsigned webhooks are admitted (development bypass is active)");
        }
    }
}
