//! Notification analytics repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::result::AppResult;
use foodrx_entity::notification::NotificationAnalyticsEvent;

use crate::store::AnalyticsSink;

/// Append-only repository for delivery analytics.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    /// Create a new analytics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsSink for AnalyticsRepository {
    async fn record(&self, event: &NotificationAnalyticsEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notification_analytics \
               (id, user_id, notification_id, action, timestamp, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.notification_id)
        .bind(event.action)
        .bind(event.timestamp)
        .bind(&event.metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record analytics event", e)
        })?;
        Ok(())
    }
}
