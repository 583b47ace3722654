// File: watchtower/src/config/secrets.rs
//! Secrets loader for the webhook secret, API keys and alert credentials.
//!
//! Secrets live in a separate TOML file (config/secrets.toml) that should be
//! excluded from version control. Every value can be overridden from the
//! environment, which is how container deployments inject them.
//!
//! Example secrets.toml:
//! ```toml
//! webhook_secret = "shared-with-the-payment-provider"
//! api_probe_key = "provider-api-key"
//! sync_api_key = "billing-backend-key"
//! alert_token = "notification-gateway-token"
//! admin_api_key = "dashboard-key"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Structure matching the secrets.toml file format
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Secrets {
    pub webhook_secret: Option<String>,
    pub api_probe_key: Option<String>,
    pub sync_api_key: Option<String>,
    pub alert_token: Option<String>,
    pub admin_api_key: Option<String>,
}

/// Loader for secrets from the secrets.toml file
pub struct SecretsLoader {
    secrets: Secrets,
}

impl SecretsLoader {
    /// Load secrets from the specified file path.
    /// Returns an empty loader if the file doesn't exist.
    pub fn load(secrets_path: &Path) -> Result<Self> {
        if !secrets_path.exists() {
            warn!(
                "Secrets file not found at {:?}, relying on environment overrides",
                secrets_path
            );
            return Ok(Self {
                secrets: Secrets::default(),
            });
        }

        let content = std::fs::read_to_string(secrets_path)
            .with_context(|| format!("Failed to read secrets file: {:?}", secrets_path))?;

        let secrets: Secrets = toml::from_str(&content)
            .with_context(|| format!("Failed to parse secrets file: {:?}", secrets_path))?;

        info!("Loaded secrets from {:?}", secrets_path);

        Ok(Self { secrets })
    }

    /// Apply `WATCHTOWER_*` environment overrides on top of the file values
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, keyed by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots: [(&str, &mut Option<String>); 5] = [
            ("WATCHTOWER_WEBHOOK_SECRET", &mut self.secrets.webhook_secret),
            ("WATCHTOWER_API_PROBE_KEY", &mut self.secrets.api_probe_key),
            ("WATCHTOWER_SYNC_API_KEY", &mut self.secrets.sync_api_key),
            ("WATCHTOWER_ALERT_TOKEN", &mut self.secrets.alert_token),
            ("WATCHTOWER_ADMIN_API_KEY", &mut self.secrets.admin_api_key),
        ];

        for (key, slot) in slots {
            if let Some(value) = lookup(key) {
                *slot = Some(value);
            }
        }

        self
    }

    /// Final secrets with blank values treated as absent
    pub fn into_secrets(self) -> Secrets {
        let Secrets {
            webhook_secret,
            api_probe_key,
            sync_api_key,
            alert_token,
            admin_api_key,
        } = self.secrets;

        Secrets {
            webhook_secret: non_blank(webhook_secret),
            api_probe_key: non_blank(api_probe_key),
            sync_api_key: non_blank(sync_api_key),
            alert_token: non_blank(alert_token),
            admin_api_key: non_blank(admin_api_key),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
