//! Bounded, coalescing store of the latest status per service
//!
//! Entries are kept most-recent-first and capped at
//! [`LOG_STORE_CAPACITY`](crate::constants::logs::LOG_STORE_CAPACITY).
//! A repeated `(service, status)` refreshes the existing entry instead of
//! appending a duplicate; a status change always appends, so the dashboard
//! keeps the transition history.

use crate::constants::logs::LOG_STORE_CAPACITY;
use crate::health::{CheckStatus, HealthCheckResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A status report to be merged into the store
#[derive(Debug, Clone)]
pub struct LogUpdate {
    pub service: String,
    pub status: CheckStatus,
    pub message: String,
    pub details: Option<String>,
}

impl From<&HealthCheckResult> for LogUpdate {
    fn from(result: &HealthCheckResult) -> Self {
        Self {
            service: result.service.clone(),
            status: result.status,
            message: result.message.clone(),
            details: result.details.clone(),
        }
    }
}

pub struct LogStore {
    // Front is the most recent entry. Only `add` writes, and it always
    // writes at the front, so the first match per service is its newest entry.
    entries: RwLock<VecDeque<LogEntry>>,
    capacity: usize,
}

impl LogStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(LOG_STORE_CAPACITY + 1)),
            capacity: LOG_STORE_CAPACITY,
        }
    }

    /// Merge a status report and return the entry as stored.
    pub async fn add(&self, update: LogUpdate) -> LogEntry {
        let mut entries = self.entries.write().await;
        let now = Utc::now();

        if let Some(index) = entries.iter().position(|e| e.service == update.service) {
            if entries[index].status == update.status {
                if let Some(mut entry) = entries.remove(index) {
                    entry.message = update.message;
                    entry.details = update.details;
                    entry.timestamp = now;
                    entries.push_front(entry.clone());
                    debug!("Coalesced {} {:?} log entry", entry.service, entry.status);
                    return entry;
                }
            }
        }

        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            service: update.service,
            status: update.status,
            message: update.message,
            details: update.details,
        };

        entries.push_front(entry.clone());
        entries.truncate(self.capacity);
        entry
    }

    /// Snapshot of all entries, most recent first
    pub async fn get(&self) -> Vec<LogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    /// Newest entry recorded for a service
    pub async fn latest(&self, service: &str) -> Option<LogEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.service == service)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
