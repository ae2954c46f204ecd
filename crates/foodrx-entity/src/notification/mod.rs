//! Notification domain entities.

pub mod analytics;
pub mod kind;
pub mod model;

pub use analytics::{AnalyticsAction, NotificationAnalyticsEvent};
pub use kind::NotificationKind;
pub use model::{NewNotification, Notification};
