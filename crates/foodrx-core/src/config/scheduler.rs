//! Cron scheduler configuration.

use serde::{Deserialize, Serialize};

/// Cron expressions (six fields, seconds first, UTC) for each periodic trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Expiring-ingredient digest generation.
    #[serde(default = "default_expiring_ingredients")]
    pub expiring_ingredients: String,
    /// Tracker reminder generation.
    #[serde(default = "default_tracker_reminder")]
    pub tracker_reminder: String,
    /// Pending notification delivery.
    #[serde(default = "default_delivery")]
    pub delivery: String,
    /// Daily tracker reset.
    #[serde(default = "default_daily_reset")]
    pub daily_reset: String,
    /// Weekly tracker reset.
    #[serde(default = "default_weekly_reset")]
    pub weekly_reset: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiring_ingredients: default_expiring_ingredients(),
            tracker_reminder: default_tracker_reminder(),
            delivery: default_delivery(),
            daily_reset: default_daily_reset(),
            weekly_reset: default_weekly_reset(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_expiring_ingredients() -> String {
    "0 0 9 * * *".to_string()
}

fn default_tracker_reminder() -> String {
    "0 0 20 * * *".to_string()
}

fn default_delivery() -> String {
    "0 */5 * * * *".to_string()
}

fn default_daily_reset() -> String {
    "0 0 0 * * *".to_string()
}

fn default_weekly_reset() -> String {
    "0 0 0 * * Sun".to_string()
}
