//! Admin-initiated notifications.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use foodrx_core::error::AppError;
use foodrx_core::result::AppResult;
use foodrx_core::types::{NotificationId, UserId};
use foodrx_database::store::{NotificationStore, Stores};
use foodrx_entity::notification::{NewNotification, NotificationKind};

/// A custom notification for one or more users.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminNotificationRequest {
    /// Recipients. Duplicates receive a single record.
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    pub user_ids: Vec<UserId>,
    /// Notification title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Notification body.
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    /// Notification type; `admin` when omitted. Generated once-per-day
    /// types are rejected.
    #[serde(default)]
    pub kind: Option<String>,
    /// Delivery priority (`high` or `normal`).
    #[serde(default)]
    pub priority: Option<String>,
}

/// What an admin send produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotificationResult {
    /// Records queued for delivery.
    pub notifications_created: u64,
    /// Identifiers of the queued records.
    pub notification_ids: Vec<NotificationId>,
}

/// Queues admin notifications for the next delivery pass.
#[derive(Debug, Clone)]
pub struct AdminNotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl AdminNotificationService {
    /// Creates a new admin notification service.
    pub fn new(stores: &Stores) -> Self {
        Self {
            notifications: stores.notifications.clone(),
        }
    }

    /// Validate `request` and insert one pending record per recipient.
    pub async fn send(&self, request: AdminNotificationRequest) -> AppResult<AdminNotificationResult> {
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid admin notification: {e}")))?;

        let title = request.title.trim();
        let message = request.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(AppError::validation("Title and message must not be blank"));
        }

        let kind = request
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(NotificationKind::from)
            .unwrap_or(NotificationKind::Admin);
        // Once-per-day kinds are keyed by day and owned by the generation engine.
        if kind.is_once_per_day() {
            return Err(AppError::validation(format!(
                "Notification type '{kind}' is reserved for scheduled generation"
            )));
        }

        let mut seen = HashSet::new();
        let recipients: Vec<UserId> = request
            .user_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let now = Utc::now();
        let mut result = AdminNotificationResult::default();
        for user_id in recipients {
            let mut new = NewNotification::new(user_id, kind.clone(), title, message);
            new.priority = request.priority.clone();
            let created = self.notifications.insert(new, now).await?;
            result.notifications_created += 1;
            result.notification_ids.push(created.id);
        }

        info!(
            kind = %kind.as_str(),
            created = result.notifications_created,
            "Admin notifications queued"
        );
        Ok(result)
    }
}
