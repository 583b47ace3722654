//! Scripted sync pipeline for exercising the job runner
//!
//! Each stage either returns a fixed summary, fails with a message or
//! panics. Stage 1 can be held open so tests can overlap runs
//! deterministically.

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;
use watchtower::services::{RecurringPaymentSummary, SubscriptionSyncSummary, SyncPipeline};

use super::test_data::summaries;

/// What a stage does when invoked
#[derive(Debug, Clone)]
pub enum StageBehavior<T> {
    Succeed(T),
    Fail(String),
    Panic,
}

impl<T: Clone> StageBehavior<T> {
    fn resolve(&self) -> Result<T> {
        match self {
            StageBehavior::Succeed(summary) => Ok(summary.clone()),
            StageBehavior::Fail(message) => Err(anyhow!(message.clone())),
            StageBehavior::Panic => panic!("stage blew up"),
        }
    }
}

pub struct MockSyncPipeline {
    subscriptions: StageBehavior<SubscriptionSyncSummary>,
    payments: StageBehavior<RecurringPaymentSummary>,
    hold_first_stage: bool,
    started: Notify,
    release: Notify,
    subscription_calls: AtomicUsize,
    payment_calls: AtomicUsize,
    call_order: Mutex<Vec<&'static str>>,
}

impl MockSyncPipeline {
    /// Both stages succeed with the reference summaries (8/2/10 and 5/3/5)
    pub fn new() -> Self {
        Self {
            subscriptions: StageBehavior::Succeed(summaries::subscriptions()),
            payments: StageBehavior::Succeed(summaries::payments()),
            hold_first_stage: false,
            started: Notify::new(),
            release: Notify::new(),
            subscription_calls: AtomicUsize::new(0),
            payment_calls: AtomicUsize::new(0),
            call_order: Mutex::new(Vec::new()),
        }
    }

    pub fn with_subscriptions(mut self, behavior: StageBehavior<SubscriptionSyncSummary>) -> Self {
        self.subscriptions = behavior;
        self
    }

    pub fn with_payments(mut self, behavior: StageBehavior<RecurringPaymentSummary>) -> Self {
        self.payments = behavior;
        self
    }

    /// Stage 1 blocks until [`release`](Self::release) is called
    pub fn held(mut self) -> Self {
        self.hold_first_stage = true;
        self
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Resolves once stage 1 has been entered
    pub async fn wait_until_started(&self) {
        self.started.notified().await;
    }

    pub fn subscription_calls(&self) -> usize {
        self.subscription_calls.load(Ordering::SeqCst)
    }

    pub fn payment_calls(&self) -> usize {
        self.payment_calls.load(Ordering::SeqCst)
    }

    pub fn call_order(&self) -> Vec<&'static str> {
        self.call_order.lock().unwrap().clone()
    }
}

impl Default for MockSyncPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncPipeline for MockSyncPipeline {
    fn sync_all_subscriptions(&self) -> BoxFuture<'_, Result<SubscriptionSyncSummary>> {
        Box::pin(async move {
            self.subscription_calls.fetch_add(1, Ordering::SeqCst);
            self.call_order.lock().unwrap().push("sync_all_subscriptions");
            self.started.notify_one();

            if self.hold_first_stage {
                self.release.notified().await;
            }

            self.subscriptions.resolve()
        })
    }

    fn process_recurring_payments(&self) -> BoxFuture<'_, Result<RecurringPaymentSummary>> {
        Box::pin(async move {
            self.payment_calls.fetch_add(1, Ordering::SeqCst);
            self.call_order.lock().unwrap().push("process_recurring_payments");
            self.payments.resolve()
        })
    }
}
