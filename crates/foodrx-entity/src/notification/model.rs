//! Notification entity model.

use chrono::{DateTime, NaiveDate, Utc};
use foodrx_core::types::{NotificationId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::kind::NotificationKind;

/// A notification queued for push delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// What produced the notification.
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Delivery priority override (`"high"` or `"normal"`).
    pub priority: Option<String>,
    /// Calendar day this record is unique for, on once-per-day kinds.
    pub digest_day: Option<NaiveDate>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the title or message last changed.
    pub updated_at: DateTime<Utc>,
    /// When the push provider accepted the notification.
    pub sent_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification still awaits delivery.
    pub fn is_pending(&self) -> bool {
        self.sent_at.is_none()
    }
}

/// Data for creating a new notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: UserId,
    /// What produced the notification.
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Delivery priority override.
    pub priority: Option<String>,
}

impl NewNotification {
    /// Create a notification with the default priority.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            priority: None,
        }
    }

    /// Materialize the record stored for this request.
    pub fn into_notification(
        self,
        digest_day: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            priority: self.priority,
            digest_day,
            created_at: now,
            updated_at: now,
            sent_at: None,
        }
    }
}
