//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What produced a notification.
///
/// Stored as a free-form `type` tag; unknown tags round-trip through
/// [`NotificationKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    /// Digest of pantry items about to expire.
    ExpiringIngredient,
    /// Nudge to log meals when nothing was tracked today.
    TrackerReminder,
    /// Message queued by an administrator.
    Admin,
    /// Educational content.
    Education,
    /// Any other tag.
    Other(String),
}

impl NotificationKind {
    /// Return the stored tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExpiringIngredient => "expiring_ingredient",
            Self::TrackerReminder => "tracker_reminder",
            Self::Admin => "admin",
            Self::Education => "education",
            Self::Other(tag) => tag,
        }
    }

    /// Whether at most one record per user per day may exist.
    pub fn is_once_per_day(&self) -> bool {
        matches!(self, Self::ExpiringIngredient | Self::TrackerReminder)
    }
}

impl From<&str> for NotificationKind {
    fn from(tag: &str) -> Self {
        match tag {
            "expiring_ingredient" => Self::ExpiringIngredient,
            "tracker_reminder" => Self::TrackerReminder,
            "admin" => Self::Admin,
            "education" => Self::Education,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> String {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
