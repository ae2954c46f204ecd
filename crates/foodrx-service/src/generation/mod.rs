//! Generation engine: decides who needs a notification today.

mod expiring;
mod reminder;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use foodrx_core::config::PipelineConfig;
use foodrx_core::error::AppError;
use foodrx_core::result::AppResult;
use foodrx_core::types::{OffsetCursor, RunContext, UserId};
use foodrx_database::store::{NotificationStore, PantryStore, Stores, TrackerStore, UserStore};

use crate::period::PeriodCalendar;
use crate::report::GenerationReport;

/// What a generation run looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTrigger {
    /// Pantry items expiring within the window.
    ExpiringIngredients,
    /// Users who logged nothing today.
    TrackerReminder,
}

impl GenerationTrigger {
    /// Return the trigger as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpiringIngredients => "expiring_ingredients",
            Self::TrackerReminder => "tracker_reminder",
        }
    }
}

impl fmt::Display for GenerationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationTrigger {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expiring_ingredients" => Ok(Self::ExpiringIngredients),
            "tracker_reminder" => Ok(Self::TrackerReminder),
            _ => Err(AppError::validation(format!(
                "Invalid generation trigger: '{s}'. Expected one of: expiring_ingredients, tracker_reminder"
            ))),
        }
    }
}

/// What happened for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Scans users and writes at most one notification per user, kind and day.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    users: Arc<dyn UserStore>,
    pantry: Arc<dyn PantryStore>,
    notifications: Arc<dyn NotificationStore>,
    trackers: Arc<dyn TrackerStore>,
    calendar: PeriodCalendar,
    batch_size: u32,
    expiry_window: Duration,
}

impl GenerationEngine {
    /// Creates a new generation engine.
    pub fn new(stores: &Stores, config: &PipelineConfig) -> AppResult<Self> {
        Ok(Self {
            users: stores.users.clone(),
            pantry: stores.pantry.clone(),
            notifications: stores.notifications.clone(),
            trackers: stores.trackers.clone(),
            calendar: PeriodCalendar::from_config(config)?,
            batch_size: config.batch_size,
            expiry_window: config.expiry_window()?,
        })
    }

    /// Run `trigger` against the current time.
    pub async fn generate(
        &self,
        trigger: GenerationTrigger,
        ctx: &RunContext,
    ) -> AppResult<GenerationReport> {
        self.generate_at(trigger, ctx, Utc::now()).await
    }

    /// Run `trigger` as if the current time were `now`.
    ///
    /// A failed user page aborts the run; a failed user is logged and
    /// counted.
    pub async fn generate_at(
        &self,
        trigger: GenerationTrigger,
        ctx: &RunContext,
        now: DateTime<Utc>,
    ) -> AppResult<GenerationReport> {
        info!(trigger = %trigger, "Starting generation run");

        let mut report = GenerationReport::default();
        let mut cursor = OffsetCursor::new(self.batch_size);

        while let Some(page) = cursor.next_page() {
            ctx.checkpoint(&format!("user page {}", cursor.pages_fetched() + 1))?;
            let users = self.users.fetch_page(page).await?;
            cursor.advance(users.len());

            for user in &users {
                report.users_scanned += 1;
                match self.process_user(trigger, user.id, now).await {
                    Ok(UserOutcome::Created) => report.notifications_created += 1,
                    Ok(UserOutcome::Updated) => report.notifications_updated += 1,
                    Ok(UserOutcome::Unchanged) => {}
                    Err(e) => {
                        report.users_failed += 1;
                        warn!(trigger = %trigger, user_id = %user.id, error = %e, "Skipping user");
                    }
                }
            }
        }

        info!(
            trigger = %trigger,
            created = report.notifications_created,
            updated = report.notifications_updated,
            users = report.users_scanned,
            failed = report.users_failed,
            "Generation run finished"
        );
        Ok(report)
    }

    async fn process_user(
        &self,
        trigger: GenerationTrigger,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<UserOutcome> {
        match trigger {
            GenerationTrigger::ExpiringIngredients => self.expiring_for_user(user_id, now).await,
            GenerationTrigger::TrackerReminder => self.reminder_for_user(user_id, now).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_parse() {
        assert_eq!(
            "tracker_reminder".parse::<GenerationTrigger>().unwrap(),
            GenerationTrigger::TrackerReminder
        );
        assert!("weekly".parse::<GenerationTrigger>().is_err());
    }
}
