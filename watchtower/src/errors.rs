//! Custom error types for watchtower
//!
//! Each enum maps to one failure class of the resilience subsystem.
//! None of them is allowed to terminate the process: callers turn them into
//! structured results, log records, or a boolean rejection.

use std::fmt;

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },
}

/// Probe error variants
#[derive(Debug)]
pub enum ProbeError {
    /// Target did not answer within the probe timeout
    Timeout { service: String, timeout_ms: u128 },

    /// Connection or transport failure
    Unreachable { service: String, reason: String },

    /// Target answered with a status the probe treats as failure
    BadStatus { service: String, status: u16 },

    /// The probe task itself died
    Crashed { service: String, reason: String },
}

/// Pipeline error variants
#[derive(Debug)]
pub enum PipelineError {
    /// A stage returned an error
    StageFailed { stage: String, reason: String },

    /// A stage panicked
    StagePanicked { stage: String },
}

/// Signature error variants
#[derive(Debug)]
pub enum SignatureError {
    /// No secret configured, verification fails closed
    SecretMissing,

    /// Header lacks a required field
    MissingField { field: &'static str },

    /// Supplied hash is not valid hex
    MalformedHash,

    /// Timestamp outside the accepted window
    Expired { timestamp: String },

    /// Digest mismatch
    Mismatch,
}

/// Notification error variants
#[derive(Debug)]
pub enum NotificationError {
    /// Delivery request failed
    DeliveryFailed { service: String, reason: String },

    /// Alert endpoint rejected the request
    Rejected { service: String, status: u16 },

    /// Alert endpoint did not answer in time
    Timeout { service: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout {
                service,
                timeout_ms,
            } => write!(f, "{} did not respond within {}ms", service, timeout_ms),
            ProbeError::Unreachable { service, reason } => {
                write!(f, "{} is unreachable: {}", service, reason)
            }
            ProbeError::BadStatus { service, status } => {
                write!(f, "{} answered with HTTP {}", service, status)
            }
            ProbeError::Crashed { service, reason } => {
                write!(f, "Probe for {} crashed: {}", service, reason)
            }
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::StageFailed { stage, reason } => {
                write!(f, "Stage '{}' failed: {}", stage, reason)
            }
            PipelineError::StagePanicked { stage } => {
                write!(f, "Stage '{}' panicked", stage)
            }
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::SecretMissing => write!(f, "No webhook secret configured"),
            SignatureError::MissingField { field } => {
                write!(f, "Signature header is missing '{}'", field)
            }
            SignatureError::MalformedHash => write!(f, "Signature hash is not valid hex"),
            SignatureError::Expired { timestamp } => {
                write!(f, "Signature timestamp {} is outside the accepted window", timestamp)
            }
            SignatureError::Mismatch => write!(f, "Signature mismatch"),
        }
    }
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationError::DeliveryFailed { service, reason } => {
                write!(f, "Failed to deliver alert for {}: {}", service, reason)
            }
            NotificationError::Rejected { service, status } => {
                write!(f, "Alert endpoint returned {} for {}", status, service)
            }
            NotificationError::Timeout { service } => {
                write!(f, "Alert endpoint timed out for {}", service)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for ProbeError {}
impl std::error::Error for PipelineError {}
impl std::error::Error for SignatureError {}
impl std::error::Error for NotificationError {}
