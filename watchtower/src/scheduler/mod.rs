//! Cron-based scheduling for the subscription sync pipeline
//!
//! The pipeline runs once a day at a fixed time-of-day in a fixed timezone:
//! - Stage 1 synchronizes every subscription status with the payment provider
//! - Stage 2 processes recurring payments and registers new leads
//!
//! # Features
//!
//! - **Cron-based scheduling**: configured as a 5-field expression
//!   (min hour day month dow) and converted to the 6-field form
//!   tokio-cron-scheduler expects
//! - **Timezone-aware**: the trigger fires in the configured IANA timezone
//! - **Mutual exclusion**: overlapping triggers are skipped, never queued
//! - **No retries**: a failed run waits for the next trigger or a manual run
//!
//! # Configuration
//!
//! ```toml
//! [sync]
//! enabled = true
//! schedule = "0 3 * * *"   # Daily at 03:00
//! timezone = "America/Sao_Paulo"
//! base_url = "https://billing.internal"
//! ```

pub mod operations;
pub use operations::{SyncJob, SyncJobScheduler};

use crate::services::{RecurringPaymentSummary, SubscriptionSyncSummary};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Scheduled,
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    SubscriptionSync,
    RecurringPayments,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::SubscriptionSync => write!(f, "subscription_sync"),
            PipelineStage::RecurringPayments => write!(f, "recurring_payments"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobRunResult {
    Success {
        subscriptions: SubscriptionSyncSummary,
        payments: RecurringPaymentSummary,
    },
    Failed {
        stage: PipelineStage,
        error: String,
        /// Present when the failure happened after stage 1 finished
        subscriptions: Option<SubscriptionSyncSummary>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRunRecord {
    pub run_id: String,
    pub trigger: RunTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub result: JobRunResult,
}

impl JobRunRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.result, JobRunResult::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobRunOutcome {
    Completed(JobRunRecord),
    /// Another run held the guard; no stage was invoked
    Skipped,
}

/// Convert a 5-field cron (min hour day month dow) into the 6-field form
/// (sec min hour day month dow) used by tokio-cron-scheduler.
pub fn to_six_field_cron(schedule: &str) -> Result<String> {
    let parts: Vec<&str> = schedule.split_whitespace().collect();

    if parts.len() != 5 {
        return Err(anyhow!(
            "Expected exactly 5 fields: minute hour day month dayofweek. Got {} fields: '{}'",
            parts.len(),
            schedule
        ));
    }

    validate_cron_field(parts[0], "minute", 0, 59)?;
    validate_cron_field(parts[1], "hour", 0, 23)?;
    validate_cron_field(parts[2], "day", 1, 31)?;
    validate_cron_field(parts[3], "month", 1, 12)?;
    validate_cron_field(parts[4], "dayofweek", 0, 7)?;

    Ok(format!("0 {}", parts.join(" ")))
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("Unknown timezone '{}': {}", name, e))
}

fn validate_cron_field(field: &str, name: &str, min: u32, max: u32) -> Result<()> {
    if field == "*" || field == "?" {
        return Ok(());
    }

    if let Some(step_str) = field.strip_prefix("*/") {
        let step = step_str
            .parse::<u32>()
            .map_err(|_| anyhow!("Invalid {} step value: {}", name, step_str))?;
        if step == 0 {
            return Err(anyhow!("{} step value cannot be 0", name));
        }
        return Ok(());
    }

    if field.contains(',') {
        for part in field.split(',') {
            validate_cron_field(part, name, min, max)?;
        }
        return Ok(());
    }

    if let Some((start, end)) = field.split_once('-') {
        let start = parse_in_range(start, name, min, max)?;
        let end = parse_in_range(end, name, min, max)?;
        if start > end {
            return Err(anyhow!("{} range {}-{} is reversed", name, start, end));
        }
        return Ok(());
    }

    parse_in_range(field, name, min, max).map(|_| ())
}

fn parse_in_range(value: &str, name: &str, min: u32, max: u32) -> Result<u32> {
    let parsed = value
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))?;

    if parsed < min || parsed > max {
        return Err(anyhow!(
            "{} value {} is outside valid range {}-{}",
            name,
            parsed,
            min,
            max
        ));
    }

    Ok(parsed)
}
