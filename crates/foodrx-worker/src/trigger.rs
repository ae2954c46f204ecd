//! Trigger kinds accepted by the executor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use foodrx_core::error::AppError;
use foodrx_entity::tracker::PeriodType;
use foodrx_service::GenerationTrigger;

/// The operation a trigger selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Generate expiring-ingredient digests.
    #[serde(rename = "expiring_ingredients")]
    ExpiringIngredients,
    /// Generate tracker reminders.
    #[serde(rename = "tracker_reminder")]
    TrackerReminder,
    /// Deliver pending notifications.
    #[serde(rename = "scheduled-delivery")]
    ScheduledDelivery,
    /// Close the daily tracking period.
    #[serde(rename = "daily-reset")]
    DailyReset,
    /// Close the weekly tracking period.
    #[serde(rename = "weekly-reset")]
    WeeklyReset,
    /// Liveness probe; touches nothing.
    #[serde(rename = "test")]
    Test,
}

impl TriggerKind {
    /// Every trigger kind.
    pub const ALL: [TriggerKind; 6] = [
        Self::ExpiringIngredients,
        Self::TrackerReminder,
        Self::ScheduledDelivery,
        Self::DailyReset,
        Self::WeeklyReset,
        Self::Test,
    ];

    /// Return the wire name of the trigger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpiringIngredients => "expiring_ingredients",
            Self::TrackerReminder => "tracker_reminder",
            Self::ScheduledDelivery => "scheduled-delivery",
            Self::DailyReset => "daily-reset",
            Self::WeeklyReset => "weekly-reset",
            Self::Test => "test",
        }
    }

    /// The generation mode this trigger runs, if any.
    pub fn generation(&self) -> Option<GenerationTrigger> {
        match self {
            Self::ExpiringIngredients => Some(GenerationTrigger::ExpiringIngredients),
            Self::TrackerReminder => Some(GenerationTrigger::TrackerReminder),
            _ => None,
        }
    }

    /// The period this trigger closes, if any.
    pub fn period(&self) -> Option<PeriodType> {
        match self {
            Self::DailyReset => Some(PeriodType::Daily),
            Self::WeeklyReset => Some(PeriodType::Weekly),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expiring_ingredients" => Ok(Self::ExpiringIngredients),
            "tracker_reminder" => Ok(Self::TrackerReminder),
            "scheduled-delivery" | "scheduled" => Ok(Self::ScheduledDelivery),
            "daily-reset" => Ok(Self::DailyReset),
            "weekly-reset" => Ok(Self::WeeklyReset),
            "test" => Ok(Self::Test),
            other => Err(AppError::validation(format!(
                "Invalid trigger: '{other}'. Use one of: expiring_ingredients, tracker_reminder, \
                 scheduled-delivery, daily-reset, weekly-reset, test"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for kind in TriggerKind::ALL {
            assert_eq!(kind.as_str().parse::<TriggerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_scheduled_alias() {
        assert_eq!(
            "scheduled".parse::<TriggerKind>().unwrap(),
            TriggerKind::ScheduledDelivery
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "monthly-reset".parse::<TriggerKind>().unwrap_err();
        assert!(err.message.contains("monthly-reset"));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&TriggerKind::DailyReset).unwrap();
        assert_eq!(json, "\"daily-reset\"");
        let kind: TriggerKind = serde_json::from_str("\"tracker_reminder\"").unwrap();
        assert_eq!(kind, TriggerKind::TrackerReminder);
    }

    #[test]
    fn test_engine_mapping() {
        assert_eq!(
            TriggerKind::ExpiringIngredients.generation(),
            Some(GenerationTrigger::ExpiringIngredients)
        );
        assert_eq!(TriggerKind::WeeklyReset.period(), Some(PeriodType::Weekly));
        assert!(TriggerKind::Test.generation().is_none());
        assert!(TriggerKind::Test.period().is_none());
    }
}
