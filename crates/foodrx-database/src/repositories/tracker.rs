//! Tracker goal and progress repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::result::AppResult;
use foodrx_core::types::UserId;
use foodrx_entity::tracker::{TrackerGoal, TrackerProgressRecord};

use crate::store::TrackerStore;

/// Repository for tracker goals and progress snapshots.
#[derive(Debug, Clone)]
pub struct TrackerRepository {
    pool: PgPool,
}

impl TrackerRepository {
    /// Create a new tracker repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerStore for TrackerRepository {
    async fn has_progress_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM tracker_progress \
             WHERE user_id = $1 AND progress_date >= $2 AND progress_date < $3)",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check progress", e))
    }

    async fn find_goals(&self, user_id: UserId, weekly: bool) -> AppResult<Vec<TrackerGoal>> {
        sqlx::query_as::<_, TrackerGoal>(
            "SELECT id, user_id, name, category, goal_value, current_value, is_weekly_goal, \
                    unit, diet_type, last_updated \
             FROM user_trackers WHERE user_id = $1 AND is_weekly_goal = $2 ORDER BY id",
        )
        .bind(user_id)
        .bind(weekly)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find goals", e))
    }

    async fn insert_progress(&self, records: &[TrackerProgressRecord]) -> AppResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO tracker_progress (id, user_id, tracker_id, tracker_name, \
             tracker_category, target_value, achieved_value, progress_date, period_type, \
             diet_type, unit, created_at) ",
        );
        builder.push_values(records, |mut row, r| {
            row.push_bind(r.id)
                .push_bind(r.user_id)
                .push_bind(r.tracker_id)
                .push_bind(&r.tracker_name)
                .push_bind(&r.tracker_category)
                .push_bind(r.target_value)
                .push_bind(r.achieved_value)
                .push_bind(r.progress_date)
                .push_bind(r.period_type)
                .push_bind(&r.diet_type)
                .push_bind(&r.unit)
                .push_bind(r.created_at);
        });

        let result = builder.build().execute(&mut *tx).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert progress records", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit progress records", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn reset_goals(
        &self,
        user_id: UserId,
        weekly: bool,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_trackers SET current_value = 0, last_updated = $3 \
             WHERE user_id = $1 AND is_weekly_goal = $2",
        )
        .bind(user_id)
        .bind(weekly)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reset goals", e))?;
        Ok(result.rows_affected())
    }
}
