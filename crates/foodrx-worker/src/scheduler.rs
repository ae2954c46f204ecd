//! Cron scheduler for the periodic triggers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use foodrx_core::config::SchedulerConfig;
use foodrx_core::error::AppError;
use foodrx_core::types::RunContext;

use crate::executor::{JobExecutor, TriggerOutcome};
use crate::trigger::TriggerKind;

/// Cron-based scheduler that runs triggers through the executor.
pub struct CronScheduler {
    scheduler: JobScheduler,
    executor: Arc<JobExecutor>,
    shutdown: CancellationToken,
    run_deadline: Option<Duration>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("run_deadline", &self.run_deadline)
            .finish_non_exhaustive()
    }
}

impl CronScheduler {
    /// Create a scheduler whose runs stop when `shutdown` is cancelled.
    pub async fn new(
        executor: Arc<JobExecutor>,
        shutdown: CancellationToken,
        run_deadline: Option<Duration>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            executor,
            shutdown,
            run_deadline,
        })
    }

    /// Register every periodic trigger from configuration.
    pub async fn register_default_tasks(&self, config: &SchedulerConfig) -> Result<(), AppError> {
        self.register(TriggerKind::ExpiringIngredients, &config.expiring_ingredients)
            .await?;
        self.register(TriggerKind::TrackerReminder, &config.tracker_reminder)
            .await?;
        self.register(TriggerKind::ScheduledDelivery, &config.delivery)
            .await?;
        self.register(TriggerKind::DailyReset, &config.daily_reset)
            .await?;
        self.register(TriggerKind::WeeklyReset, &config.weekly_reset)
            .await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Run `trigger` on a six-field cron `schedule` (UTC).
    pub async fn register(&self, trigger: TriggerKind, schedule: &str) -> Result<(), AppError> {
        let executor = Arc::clone(&self.executor);
        let shutdown = self.shutdown.clone();
        let deadline = self.run_deadline;
        let in_flight = Arc::new(AtomicBool::new(false));

        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let shutdown = shutdown.clone();
            let in_flight = Arc::clone(&in_flight);
            Box::pin(async move {
                run_tick(&executor, trigger, &in_flight, &shutdown, deadline).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid schedule '{schedule}' for trigger '{trigger}': {e}"
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add schedule for '{trigger}': {e}"))
        })?;

        info!(trigger = %trigger, schedule = %schedule, "Registered scheduled trigger");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}

/// Clears the in-flight flag when a tick finishes, even on panic.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One scheduled run of `trigger`.
///
/// Skipped while a previous run of the same trigger is still in flight or
/// after shutdown has begun.
pub(crate) async fn run_tick(
    executor: &JobExecutor,
    trigger: TriggerKind,
    in_flight: &AtomicBool,
    shutdown: &CancellationToken,
    deadline: Option<Duration>,
) -> Option<TriggerOutcome> {
    if shutdown.is_cancelled() {
        debug!(trigger = %trigger, "Shutting down, tick skipped");
        return None;
    }
    if in_flight.swap(true, Ordering::AcqRel) {
        warn!(trigger = %trigger, "Previous run still in flight, tick skipped");
        return None;
    }
    let _guard = InFlight(in_flight);

    let ctx = RunContext::child_of(shutdown, deadline);
    match executor.execute(trigger, &ctx).await {
        Ok(outcome) => {
            info!(trigger = %trigger, report = %outcome.report, "Scheduled run finished");
            Some(outcome)
        }
        Err(e) => {
            error!(trigger = %trigger, error = %e, "Scheduled run failed");
            None
        }
    }
}
