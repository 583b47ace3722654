//! Central repository for timeouts, intervals, limits and default values
//!
//! Constants are grouped by the component that consumes them so the
//! defaults in `config` and the behavior in each module stay in sync.

use std::time::Duration;

/// HTTP client timeout constants
pub mod http {
    use super::Duration;

    /// Timeout for the public liveness probe
    pub const LIVENESS_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for the authenticated API probe
    pub const API_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Timeout for a single sync pipeline stage call
    pub const SYNC_STAGE_TIMEOUT: Duration = Duration::from_secs(600);

    /// Timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Alert system constants
pub mod alerts {
    /// Minimum minutes between two alerts for the same service
    pub const COOLDOWN_MINUTES: i64 = 30;

    /// Alert webhook request timeout
    pub const WEBHOOK_TIMEOUT_SECONDS: u64 = 10;
}

/// Log store constants
pub mod logs {
    /// Maximum number of entries retained for the dashboard
    pub const LOG_STORE_CAPACITY: usize = 100;
}

/// Webhook ingress constants
pub mod webhooks {
    /// Header carrying `ts=<unix-seconds>,v1=<hex-hmac>`
    pub const SIGNATURE_HEADER: &str = "x-signature";

    /// Header carrying the request identifier mixed into the signed manifest
    pub const REQUEST_ID_HEADER: &str = "x-request-id";

    /// Field name of the timestamp in the signature header
    pub const TIMESTAMP_FIELD: &str = "ts";

    /// Field name of the hash in the signature header
    pub const HASH_FIELD: &str = "v1";
}

/// Default configuration values
pub mod defaults {
    /// Default health check interval in seconds (5 minutes)
    pub const HEALTH_CHECK_INTERVAL_SECONDS: u64 = 300;

    /// Default daily sync schedule, 5-field cron (03:00)
    pub const SYNC_SCHEDULE: &str = "0 3 * * *";

    /// Default timezone for the sync schedule
    pub const SYNC_TIMEZONE: &str = "America/Sao_Paulo";

    /// Default path hit by the authenticated API probe
    pub const API_PROBE_PATH: &str = "/v3/myAccount";

    /// Default header carrying the API probe key
    pub const API_PROBE_KEY_HEADER: &str = "access_token";

    /// Default service names reported by the probes
    pub const LIVENESS_SERVICE_NAME: &str = "website";
    pub const API_SERVICE_NAME: &str = "payments-api";

    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8095;
}
