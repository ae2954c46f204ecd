//! Period reset engine: snapshot tracker progress, then zero the counters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use foodrx_core::config::PipelineConfig;
use foodrx_core::result::AppResult;
use foodrx_core::types::{OffsetCursor, RunContext, UserId};
use foodrx_database::store::{Stores, TrackerStore, UserStore};
use foodrx_entity::tracker::{PeriodType, TrackerProgressRecord};

use crate::period::PeriodCalendar;
use crate::report::ResetReport;

/// Closes a daily or weekly tracking period for every user.
#[derive(Debug, Clone)]
pub struct PeriodResetEngine {
    users: Arc<dyn UserStore>,
    trackers: Arc<dyn TrackerStore>,
    calendar: PeriodCalendar,
    batch_size: u32,
}

impl PeriodResetEngine {
    /// Creates a new period reset engine.
    pub fn new(stores: &Stores, config: &PipelineConfig) -> AppResult<Self> {
        Ok(Self {
            users: stores.users.clone(),
            trackers: stores.trackers.clone(),
            calendar: PeriodCalendar::from_config(config)?,
            batch_size: config.batch_size,
        })
    }

    /// Close the most recent `period` relative to the current time.
    pub async fn reset_period(
        &self,
        period: PeriodType,
        ctx: &RunContext,
    ) -> AppResult<ResetReport> {
        self.reset_period_at(period, ctx, Utc::now()).await
    }

    /// Close the most recent `period` as if the current time were `now`.
    ///
    /// Counters are zeroed even when the snapshot insert fails.
    pub async fn reset_period_at(
        &self,
        period: PeriodType,
        ctx: &RunContext,
        now: DateTime<Utc>,
    ) -> AppResult<ResetReport> {
        let period_end = self.calendar.period_end(period, now)?;
        info!(period = %period, period_end = %period_end, "Starting period reset");

        let mut report = ResetReport::default();
        let mut cursor = OffsetCursor::new(self.batch_size);

        while let Some(page) = cursor.next_page() {
            ctx.checkpoint(&format!("user page {}", cursor.pages_fetched() + 1))?;
            let users = self.users.fetch_page(page).await?;
            cursor.advance(users.len());

            for user in &users {
                report.users_processed += 1;
                self.reset_user(user.id, period, period_end, now, &mut report)
                    .await;
            }
        }

        info!(
            period = %period,
            users = report.users_processed,
            snapshots = report.snapshots_written,
            goals_reset = report.goals_reset,
            snapshot_failures = report.snapshot_failures,
            reset_failures = report.reset_failures,
            "Period reset finished"
        );
        Ok(report)
    }

    async fn reset_user(
        &self,
        user_id: UserId,
        period: PeriodType,
        period_end: DateTime<Utc>,
        now: DateTime<Utc>,
        report: &mut ResetReport,
    ) {
        let weekly = period.is_weekly();
        let goals = match self.trackers.find_goals(user_id, weekly).await {
            Ok(goals) => goals,
            Err(e) => {
                report.reset_failures += 1;
                warn!(user_id = %user_id, period = %period, error = %e, "Failed to load goals");
                return;
            }
        };
        if goals.is_empty() {
            return;
        }

        let snapshots: Vec<TrackerProgressRecord> = goals
            .iter()
            .filter_map(|goal| TrackerProgressRecord::snapshot(goal, period, period_end, now))
            .collect();

        if !snapshots.is_empty() {
            match self.trackers.insert_progress(&snapshots).await {
                Ok(written) => report.snapshots_written += written,
                Err(e) => {
                    report.snapshot_failures += 1;
                    error!(
                        user_id = %user_id,
                        period = %period,
                        records = snapshots.len(),
                        error = %e,
                        "Failed to write progress snapshots, resetting anyway"
                    );
                }
            }
        }

        match self.trackers.reset_goals(user_id, weekly, now).await {
            Ok(count) => {
                report.goals_reset += count;
                debug!(user_id = %user_id, period = %period, goals = count, "Goals reset");
            }
            Err(e) => {
                report.reset_failures += 1;
                warn!(user_id = %user_id, period = %period, error = %e, "Failed to reset goals");
            }
        }
    }
}
