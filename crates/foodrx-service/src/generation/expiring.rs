//! Expiring-ingredient digests.

use chrono::{DateTime, Utc};
use tracing::debug;

use foodrx_core::result::AppResult;
use foodrx_core::types::UserId;
use foodrx_database::store::UpsertOutcome;
use foodrx_entity::notification::{NewNotification, NotificationKind};

use super::{GenerationEngine, UserOutcome};
use crate::digest::compose_expiring_digest;

impl GenerationEngine {
    /// Write or refresh today's digest for one user.
    pub(super) async fn expiring_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<UserOutcome> {
        let items = self
            .pantry
            .find_expiring(user_id, now, now + self.expiry_window)
            .await?;

        let Some(digest) = compose_expiring_digest(&items) else {
            return Ok(UserOutcome::Unchanged);
        };

        let new = NewNotification::new(
            user_id,
            NotificationKind::ExpiringIngredient,
            digest.title,
            digest.message,
        );
        let day = self.calendar.today(now);

        let outcome = self.notifications.upsert_daily_digest(new, day, now).await?;
        debug!(user_id = %user_id, items = items.len(), outcome = ?outcome, "Expiring digest written");

        Ok(match outcome {
            UpsertOutcome::Inserted => UserOutcome::Created,
            UpsertOutcome::Updated => UserOutcome::Updated,
        })
    }
}
