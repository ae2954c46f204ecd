//! Tracker goal entity model.

use chrono::{DateTime, Utc};
use foodrx_core::types::{TrackerId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's running counter toward a daily or weekly target.
///
/// `current_value` is advanced by the tracking feature of the main
/// application and zeroed by the period reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrackerGoal {
    /// Unique tracker identifier.
    pub id: TrackerId,
    /// Owning user.
    pub user_id: UserId,
    /// Tracker name (e.g. "Water").
    pub name: String,
    /// Tracker category (e.g. "hydration").
    pub category: String,
    /// Target for the period.
    pub goal_value: f64,
    /// Progress accumulated in the current period.
    pub current_value: f64,
    /// Whether the goal resets weekly instead of daily.
    pub is_weekly_goal: bool,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Diet the tracker belongs to.
    pub diet_type: Option<String>,
    /// When the counter last changed.
    pub last_updated: Option<DateTime<Utc>>,
}

impl TrackerGoal {
    /// Whether any progress was made in the current period.
    pub fn has_progress(&self) -> bool {
        self.current_value > 0.0
    }
}
