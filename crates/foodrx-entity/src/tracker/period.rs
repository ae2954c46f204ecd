//! Tracking period enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of the window a tracker goal accumulates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "period_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Resets every day.
    Daily,
    /// Resets at the end of each week.
    Weekly,
}

impl PeriodType {
    /// Whether goals of this period carry the weekly flag.
    pub fn is_weekly(&self) -> bool {
        matches!(self, Self::Weekly)
    }

    /// Return the period as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = foodrx_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(foodrx_core::AppError::validation(format!(
                "Invalid period: '{s}'. Expected one of: daily, weekly"
            ))),
        }
    }
}
