//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::result::AppResult;
use foodrx_core::types::{KeysetPage, NotificationId};
use foodrx_entity::notification::{NewNotification, Notification};

use crate::store::{NotificationStore, UpsertOutcome};

const COLUMNS: &str =
    "id, user_id, type, title, message, priority, digest_day, created_at, updated_at, sent_at";

/// Repository for the notification queue.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn upsert_daily_digest(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<UpsertOutcome> {
        // xmax is zero only on rows created by this statement.
        let inserted: bool = sqlx::query_scalar(
            "INSERT INTO notifications \
               (id, user_id, type, title, message, priority, digest_day, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             ON CONFLICT (user_id, type, digest_day) WHERE digest_day IS NOT NULL \
             DO UPDATE SET title = EXCLUDED.title, message = EXCLUDED.message, \
                           updated_at = EXCLUDED.updated_at \
             RETURNING (xmax = 0)",
        )
        .bind(NotificationId::new())
        .bind(new.user_id)
        .bind(new.kind.as_str())
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.priority.as_deref())
        .bind(day)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert digest", e))?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn insert_once_per_day(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO notifications \
               (id, user_id, type, title, message, priority, digest_day, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             ON CONFLICT (user_id, type, digest_day) WHERE digest_day IS NOT NULL DO NOTHING",
        )
        .bind(NotificationId::new())
        .bind(new.user_id)
        .bind(new.kind.as_str())
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.priority.as_deref())
        .bind(day)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert daily notification", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert(&self, new: NewNotification, now: DateTime<Utc>) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications \
               (id, user_id, type, title, message, priority, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {COLUMNS}"
        ))
        .bind(NotificationId::new())
        .bind(new.user_id)
        .bind(new.kind.as_str())
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.priority.as_deref())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET sent_at = $2 WHERE id = $1 AND sent_at IS NULL")
                .bind(id)
                .bind(at)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark sent", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn fetch_pending(
        &self,
        page: &KeysetPage<NotificationId>,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE sent_at IS NULL AND ($1::uuid IS NULL OR id > $1) \
             ORDER BY id LIMIT $2"
        ))
        .bind(page.after)
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch pending notifications", e)
        })
    }

    async fn count_pending(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE sent_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count pending", e)
                })?;
        Ok(count.max(0) as u64)
    }
}
