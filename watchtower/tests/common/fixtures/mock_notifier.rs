//! In-process alert notifiers

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use watchtower::services::AlertNotifier;

/// Captured alert
#[derive(Debug, Clone, PartialEq)]
pub struct SentAlert {
    pub service: String,
    pub message: String,
}

/// Accepts every alert and keeps a copy
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<SentAlert>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<SentAlert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn count_for(&self, service: &str) -> usize {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|alert| alert.service == service)
            .count()
    }
}

impl AlertNotifier for RecordingNotifier {
    fn send_alert<'a>(&'a self, service: &'a str, message: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.alerts.lock().unwrap().push(SentAlert {
                service: service.to_string(),
                message: message.to_string(),
            });
            Ok(())
        })
    }
}

/// Rejects every alert, counting attempts
#[derive(Default)]
pub struct FailingNotifier {
    attempts: AtomicUsize,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AlertNotifier for FailingNotifier {
    fn send_alert<'a>(&'a self, _service: &'a str, _message: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("notification gateway unavailable"))
        })
    }
}
