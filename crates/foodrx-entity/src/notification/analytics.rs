//! Notification delivery analytics.

use chrono::{DateTime, Utc};
use foodrx_core::types::{AnalyticsEventId, NotificationId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "analytics_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsAction {
    /// The provider accepted the message.
    Sent,
    /// The provider rejected the message or the commit failed.
    Failed,
}

impl AnalyticsAction {
    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Append-only record of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NotificationAnalyticsEvent {
    /// Unique event identifier.
    pub id: AnalyticsEventId,
    /// The recipient user.
    pub user_id: UserId,
    /// The notification attempted.
    pub notification_id: NotificationId,
    /// Attempt outcome.
    pub action: AnalyticsAction,
    /// When the attempt finished.
    pub timestamp: DateTime<Utc>,
    /// Provider message id or error detail.
    pub metadata: serde_json::Value,
}

impl NotificationAnalyticsEvent {
    /// A successful delivery.
    pub fn sent(
        user_id: UserId,
        notification_id: NotificationId,
        message_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AnalyticsEventId::new(),
            user_id,
            notification_id,
            action: AnalyticsAction::Sent,
            timestamp: now,
            metadata: serde_json::json!({ "messageId": message_id }),
        }
    }

    /// A failed delivery.
    pub fn failed(
        user_id: UserId,
        notification_id: NotificationId,
        code: &str,
        error: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AnalyticsEventId::new(),
            user_id,
            notification_id,
            action: AnalyticsAction::Failed,
            timestamp: now,
            metadata: serde_json::json!({ "code": code, "error": error }),
        }
    }
}
