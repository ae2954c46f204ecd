//! Tracker progress snapshot entity.

use chrono::{DateTime, Utc};
use foodrx_core::types::{ProgressRecordId, TrackerId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::goal::TrackerGoal;
use super::period::PeriodType;

/// Immutable record of what a goal achieved in a closed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrackerProgressRecord {
    /// Unique record identifier.
    pub id: ProgressRecordId,
    /// Owning user.
    pub user_id: UserId,
    /// The goal this snapshot was taken from.
    pub tracker_id: TrackerId,
    /// Goal name at snapshot time.
    pub tracker_name: String,
    /// Goal category at snapshot time.
    pub tracker_category: String,
    /// Goal target at snapshot time.
    pub target_value: f64,
    /// Value reached before the reset.
    pub achieved_value: f64,
    /// Last instant of the closed period.
    pub progress_date: DateTime<Utc>,
    /// Period the snapshot covers.
    pub period_type: PeriodType,
    /// Diet the goal belonged to.
    pub diet_type: Option<String>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}

impl TrackerProgressRecord {
    /// Snapshot a goal at the end of a period.
    ///
    /// Returns `None` when the goal made no progress.
    pub fn snapshot(
        goal: &TrackerGoal,
        period: PeriodType,
        progress_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if !goal.has_progress() {
            return None;
        }
        Some(Self {
            id: ProgressRecordId::new(),
            user_id: goal.user_id,
            tracker_id: goal.id,
            tracker_name: goal.name.clone(),
            tracker_category: goal.category.clone(),
            target_value: goal.goal_value,
            achieved_value: goal.current_value,
            progress_date,
            period_type: period,
            diet_type: goal.diet_type.clone(),
            unit: goal.unit.clone(),
            created_at: now,
        })
    }
}
