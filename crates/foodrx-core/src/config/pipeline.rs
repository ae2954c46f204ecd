//! Batch pipeline configuration.

use chrono::{Duration, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted expiry look-ahead.
const MAX_EXPIRY_WINDOW_DAYS: i64 = 365;

/// Tuning knobs shared by the generation, delivery and reset engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Page size used when scanning users and pending notifications.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// How many days ahead a pantry item counts as "expiring soon".
    #[serde(default = "default_expiry_window_days")]
    pub expiry_window_days: i64,
    /// Offset of the target timezone from UTC, in minutes.
    ///
    /// Calendar days ("today", the previous day, the previous week) are
    /// computed in this offset.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Last day of a tracking week (e.g. `"saturday"`).
    #[serde(default = "default_week_end_day")]
    pub week_end_day: String,
    /// Maximum in-flight sends within one delivery batch.
    #[serde(default = "default_delivery_concurrency")]
    pub delivery_concurrency: usize,
    /// Upper bound on a single pass, checked between pages. `0` disables it.
    #[serde(default = "default_run_deadline")]
    pub run_deadline_seconds: u64,
}

impl PipelineConfig {
    /// The configured timezone as a fixed offset.
    pub fn offset(&self) -> Result<FixedOffset, AppError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "pipeline.utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }

    /// How far ahead pantry items count as expiring.
    pub fn expiry_window(&self) -> Result<Duration, AppError> {
        if !(0..=MAX_EXPIRY_WINDOW_DAYS).contains(&self.expiry_window_days) {
            return Err(AppError::configuration(format!(
                "pipeline.expiry_window_days must be between 0 and {MAX_EXPIRY_WINDOW_DAYS}, got {}",
                self.expiry_window_days
            )));
        }
        Duration::try_days(self.expiry_window_days).ok_or_else(|| {
            AppError::configuration("pipeline.expiry_window_days out of range")
        })
    }

    /// The configured week-ending day.
    pub fn week_end(&self) -> Result<Weekday, AppError> {
        self.week_end_day.parse::<Weekday>().map_err(|_| {
            AppError::configuration(format!(
                "pipeline.week_end_day is not a weekday: '{}'",
                self.week_end_day
            ))
        })
    }

    /// The run deadline, if one is configured.
    pub fn run_deadline(&self) -> Option<std::time::Duration> {
        (self.run_deadline_seconds > 0)
            .then(|| std::time::Duration::from_secs(self.run_deadline_seconds))
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.batch_size == 0 {
            return Err(AppError::configuration("pipeline.batch_size must be > 0"));
        }
        if self.delivery_concurrency == 0 {
            return Err(AppError::configuration(
                "pipeline.delivery_concurrency must be > 0",
            ));
        }
        self.expiry_window()?;
        self.offset()?;
        self.week_end()?;
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            expiry_window_days: default_expiry_window_days(),
            utc_offset_minutes: 0,
            week_end_day: default_week_end_day(),
            delivery_concurrency: default_delivery_concurrency(),
            run_deadline_seconds: default_run_deadline(),
        }
    }
}

fn default_batch_size() -> u32 {
    1000
}

fn default_expiry_window_days() -> i64 {
    3
}

fn default_week_end_day() -> String {
    "saturday".to_string()
}

fn default_delivery_concurrency() -> usize {
    1
}

fn default_run_deadline() -> u64 {
    540
}
