// File: watchtower/src/scheduler/operations.rs
use super::{
    parse_timezone, to_six_field_cron, JobRunOutcome, JobRunRecord, JobRunResult, PipelineStage,
    RunTrigger,
};
use crate::errors::PipelineError;
use crate::services::SyncPipeline;
use anyhow::{anyhow, Result};
use chrono::Utc;
use chrono_tz::Tz;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Holds the run flag for the lifetime of one execution and clears it on drop,
/// so every exit path (return, error, panic) releases the guard.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The guarded two-stage sync pipeline. Cheap to clone; clones share the
/// run flag and the last run record.
#[derive(Clone)]
pub struct SyncJob {
    pipeline: Arc<dyn SyncPipeline>,
    running: Arc<AtomicBool>,
    last_run: Arc<RwLock<Option<JobRunRecord>>>,
}

impl SyncJob {
    pub fn new(pipeline: Arc<dyn SyncPipeline>) -> Self {
        Self {
            pipeline,
            running: Arc::new(AtomicBool::new(false)),
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub async fn last_run(&self) -> Option<JobRunRecord> {
        self.last_run.read().await.clone()
    }

    /// Run both stages unless a run is already in progress.
    #[instrument(skip(self))]
    pub async fn run(&self, trigger: RunTrigger) -> JobRunOutcome {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            warn!("Sync job already running, skipping {:?} trigger", trigger);
            return JobRunOutcome::Skipped;
        };

        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(run_id = %run_id, "Starting subscription sync job");

        let result = self.execute_stages().await;

        let finished_at = Utc::now();
        let record = JobRunRecord {
            run_id,
            trigger,
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds().max(0) as u64,
            result,
        };

        match &record.result {
            JobRunResult::Success {
                subscriptions,
                payments,
            } => info!(
                run_id = %record.run_id,
                duration_ms = record.duration_ms,
                synced = subscriptions.synced,
                sync_errors = subscriptions.errors,
                subscriptions_total = subscriptions.total,
                processed = payments.processed,
                leads_added = payments.leads_added,
                payments_total = payments.total,
                "✓ Sync job completed"
            ),
            JobRunResult::Failed { stage, error, .. } => error!(
                run_id = %record.run_id,
                duration_ms = record.duration_ms,
                stage = %stage,
                "✗ Sync job failed: {}",
                error
            ),
        }

        *self.last_run.write().await = Some(record.clone());

        JobRunOutcome::Completed(record)
    }

    async fn execute_stages(&self) -> JobRunResult {
        let subscriptions = match run_stage(
            PipelineStage::SubscriptionSync,
            self.pipeline.sync_all_subscriptions(),
        )
        .await
        {
            Ok(summary) => summary,
            Err(e) => {
                return JobRunResult::Failed {
                    stage: PipelineStage::SubscriptionSync,
                    error: e.to_string(),
                    subscriptions: None,
                }
            }
        };

        if subscriptions.errors > 0 {
            warn!(
                "Subscription sync finished with {} item errors out of {}, continuing with recurring payments",
                subscriptions.errors, subscriptions.total
            );
        } else {
            debug!("Subscription sync synced {}/{}", subscriptions.synced, subscriptions.total);
        }

        match run_stage(
            PipelineStage::RecurringPayments,
            self.pipeline.process_recurring_payments(),
        )
        .await
        {
            Ok(payments) => JobRunResult::Success {
                subscriptions,
                payments,
            },
            Err(e) => JobRunResult::Failed {
                stage: PipelineStage::RecurringPayments,
                error: e.to_string(),
                subscriptions: Some(subscriptions),
            },
        }
    }
}

async fn run_stage<T>(
    stage: PipelineStage,
    future: BoxFuture<'_, Result<T>>,
) -> Result<T, PipelineError> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(summary)) => Ok(summary),
        Ok(Err(e)) => Err(PipelineError::StageFailed {
            stage: stage.to_string(),
            reason: format!("{:#}", e),
        }),
        Err(_) => Err(PipelineError::StagePanicked {
            stage: stage.to_string(),
        }),
    }
}

/// Arms the daily cron trigger for a [`SyncJob`].
pub struct SyncJobScheduler {
    job: SyncJob,
    scheduler: JobScheduler,
    schedule: String,
    timezone: Tz,
    armed_job: Mutex<Option<Uuid>>,
    scheduler_started: AtomicBool,
}

impl SyncJobScheduler {
    pub async fn new(job: SyncJob, schedule: &str, timezone: &str) -> Result<Self> {
        to_six_field_cron(schedule)
            .map_err(|e| anyhow!("Invalid sync schedule '{}': {}", schedule, e))?;
        let timezone = parse_timezone(timezone)?;

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        Ok(Self {
            job,
            scheduler,
            schedule: schedule.to_string(),
            timezone,
            armed_job: Mutex::new(None),
            scheduler_started: AtomicBool::new(false),
        })
    }

    #[instrument(skip(self), fields(schedule = %self.schedule, timezone = %self.timezone))]
    pub async fn start(&self) -> Result<()> {
        let mut armed_job = self.armed_job.lock().await;
        if armed_job.is_some() {
            warn!("Sync scheduler already started");
            return Ok(());
        }

        let cron = to_six_field_cron(&self.schedule)?;
        let sync_job = self.job.clone();

        let job = Job::new_async_tz(cron.as_str(), self.timezone, move |_uuid, _scheduler| {
            let sync_job = sync_job.clone();

            Box::pin(async move {
                info!("⏰ Scheduled sync trigger fired");
                sync_job.run(RunTrigger::Scheduled).await;
            })
        })
        .map_err(|e| anyhow!("Failed to create sync job for '{}': {}", cron, e))?;

        let job_id = self
            .scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add sync job to scheduler: {}", e))?;

        if !self.scheduler_started.swap(true, Ordering::AcqRel) {
            self.scheduler
                .start()
                .await
                .map_err(|e| anyhow!("Failed to start JobScheduler: {}", e))?;
        }

        *armed_job = Some(job_id);
        info!("✓ Sync scheduler armed: '{}' in {}", self.schedule, self.timezone);
        Ok(())
    }

    /// Cancel future triggers. An in-flight run is left to finish.
    pub async fn stop(&self) -> Result<()> {
        let mut armed_job = self.armed_job.lock().await;
        match armed_job.take() {
            None => {
                debug!("Sync scheduler not armed, nothing to stop");
                Ok(())
            }
            Some(job_id) => {
                self.scheduler
                    .remove(&job_id)
                    .await
                    .map_err(|e| anyhow!("Failed to remove sync job: {}", e))?;
                info!(
                    "Sync scheduler stopped{}",
                    if self.job.is_running() {
                        " (current run will finish)"
                    } else {
                        ""
                    }
                );
                Ok(())
            }
        }
    }

    pub async fn is_armed(&self) -> bool {
        self.armed_job.lock().await.is_some()
    }

    /// Operator-triggered run through the same guard as the cron trigger
    pub async fn run(&self) -> JobRunOutcome {
        self.job.run(RunTrigger::Manual).await
    }

    pub fn is_running(&self) -> bool {
        self.job.is_running()
    }
}
