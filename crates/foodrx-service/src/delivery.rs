//! Delivery engine: drains the pending queue through the push gateway.
//!
//! Each notification is attempted independently. Failed and skipped items
//! stay pending and are retried by the next run; the keyset cursor keeps
//! them from being fetched twice in one run.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, error, info, warn};

use foodrx_core::config::{PipelineConfig, PushConfig};
use foodrx_core::result::AppResult;
use foodrx_core::traits::push::PushGateway;
use foodrx_core::types::{KeysetCursor, NotificationId, RunContext};
use foodrx_database::store::{AnalyticsSink, NotificationStore, Stores, UserStore};
use foodrx_entity::notification::{Notification, NotificationAnalyticsEvent};
use foodrx_push::build_message;

use crate::report::DeliveryReport;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Sent,
    Failed,
    SkippedNoToken,
}

/// Sends pending notifications and records the outcome of each.
#[derive(Debug, Clone)]
pub struct DeliveryEngine {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserStore>,
    analytics: Arc<dyn AnalyticsSink>,
    gateway: Arc<dyn PushGateway>,
    batch_size: u32,
    concurrency: usize,
    android_icon: String,
}

impl DeliveryEngine {
    /// Creates a new delivery engine.
    pub fn new(
        stores: &Stores,
        gateway: Arc<dyn PushGateway>,
        pipeline: &PipelineConfig,
        push: &PushConfig,
    ) -> Self {
        Self {
            notifications: stores.notifications.clone(),
            users: stores.users.clone(),
            analytics: stores.analytics.clone(),
            gateway,
            batch_size: pipeline.batch_size,
            concurrency: pipeline.delivery_concurrency.max(1),
            android_icon: push.android_icon.clone(),
        }
    }

    /// Attempt every notification that is pending when the run starts.
    ///
    /// Count and page fetch errors abort the run; per-item errors are
    /// counted as failures.
    pub async fn deliver_pending(&self, ctx: &RunContext) -> AppResult<DeliveryReport> {
        let total_pending = self.notifications.count_pending().await?;
        let mut report = DeliveryReport {
            total_pending,
            ..DeliveryReport::default()
        };

        if total_pending == 0 {
            info!("No pending notifications");
            return Ok(report);
        }

        info!(
            total_pending,
            provider = self.gateway.provider_type(),
            "Starting delivery run"
        );

        let mut cursor: KeysetCursor<NotificationId> = KeysetCursor::new(self.batch_size);

        while let Some(page) = cursor.next_page() {
            ctx.checkpoint(&format!("pending batch {}", cursor.pages_fetched() + 1))?;
            let batch = self.notifications.fetch_pending(&page).await?;
            cursor.advance(batch.len(), batch.last().map(|n| n.id));
            if batch.is_empty() {
                break;
            }
            report.batches += 1;

            let deliveries: Vec<_> = batch
                .iter()
                .map(|notification| self.deliver_one(notification))
                .collect();
            let outcomes: Vec<ItemOutcome> = stream::iter(deliveries)
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            for outcome in outcomes {
                report.processed += 1;
                match outcome {
                    ItemOutcome::Sent => report.sent += 1,
                    ItemOutcome::Failed => report.failed += 1,
                    ItemOutcome::SkippedNoToken => report.skipped_no_token += 1,
                }
            }

            info!(
                batch = report.batches,
                size = batch.len(),
                sent = report.sent,
                failed = report.failed,
                skipped = report.skipped_no_token,
                "Delivery batch finished"
            );
        }

        info!(
            processed = report.processed,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped_no_token,
            batches = report.batches,
            "Delivery run finished"
        );
        Ok(report)
    }

    async fn deliver_one(&self, notification: &Notification) -> ItemOutcome {
        let contact = match self.users.find_contact(notification.user_id).await {
            Ok(contact) => contact,
            Err(e) => {
                warn!(
                    notification_id = %notification.id,
                    user_id = %notification.user_id,
                    error = %e,
                    "Recipient lookup failed"
                );
                return ItemOutcome::Failed;
            }
        };

        let Some(token) = contact.as_ref().and_then(|c| c.deliverable_token()) else {
            debug!(
                notification_id = %notification.id,
                user_id = %notification.user_id,
                "Recipient has no device token"
            );
            return ItemOutcome::SkippedNoToken;
        };

        let message = build_message(notification, token, &self.android_icon);

        match self.gateway.send(&message).await {
            Ok(delivery_id) => match self.notifications.mark_sent(notification.id, Utc::now()).await {
                Ok(updated) => {
                    if !updated {
                        warn!(notification_id = %notification.id, "Notification was already marked sent");
                    }
                    self.record(NotificationAnalyticsEvent::sent(
                        notification.user_id,
                        notification.id,
                        &delivery_id.0,
                        Utc::now(),
                    ))
                    .await;
                    ItemOutcome::Sent
                }
                Err(e) => {
                    error!(
                        notification_id = %notification.id,
                        error = %e,
                        "Push accepted but marking sent failed"
                    );
                    self.record(NotificationAnalyticsEvent::failed(
                        notification.user_id,
                        notification.id,
                        "commit",
                        &e.to_string(),
                        Utc::now(),
                    ))
                    .await;
                    ItemOutcome::Failed
                }
            },
            Err(e) => {
                warn!(
                    notification_id = %notification.id,
                    user_id = %notification.user_id,
                    code = e.code(),
                    error = %e,
                    "Push send failed"
                );
                self.record(NotificationAnalyticsEvent::failed(
                    notification.user_id,
                    notification.id,
                    e.code(),
                    &e.to_string(),
                    Utc::now(),
                ))
                .await;
                ItemOutcome::Failed
            }
        }
    }

    async fn record(&self, event: NotificationAnalyticsEvent) {
        if let Err(e) = self.analytics.record(&event).await {
            warn!(
                notification_id = %event.notification_id,
                action = event.action.as_str(),
                error = %e,
                "Failed to record delivery analytics"
            );
        }
    }
}
