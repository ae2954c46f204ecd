//! Tracker reminders.

use chrono::{DateTime, Utc};
use tracing::debug;

use foodrx_core::result::AppResult;
use foodrx_core::types::UserId;
use foodrx_entity::notification::{NewNotification, NotificationKind};

use super::{GenerationEngine, UserOutcome};

const REMINDER_TITLE: &str = "Time to log your meals!";
const REMINDER_MESSAGE: &str =
    "You haven't logged anything in your tracker today. Don't forget to track your meals!";

impl GenerationEngine {
    /// Remind one user unless they logged progress or were reminded today.
    pub(super) async fn reminder_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<UserOutcome> {
        let (start, end) = self.calendar.day_bounds(now)?;
        if self.trackers.has_progress_between(user_id, start, end).await? {
            debug!(user_id = %user_id, "User logged progress today");
            return Ok(UserOutcome::Unchanged);
        }

        let new = NewNotification::new(
            user_id,
            NotificationKind::TrackerReminder,
            REMINDER_TITLE,
            REMINDER_MESSAGE,
        );
        let inserted = self
            .notifications
            .insert_once_per_day(new, self.calendar.today(now), now)
            .await?;

        if inserted {
            Ok(UserOutcome::Created)
        } else {
            debug!(user_id = %user_id, "Reminder already queued today");
            Ok(UserOutcome::Unchanged)
        }
    }
}
