//! Per-kind presentation hints.

use foodrx_core::traits::push::{PlatformHints, PushPriority};
use foodrx_entity::notification::NotificationKind;

/// Accent color for kinds without a dedicated entry.
pub const DEFAULT_COLOR: &str = "#9E9E9E";

const BADGE: u32 = 1;
const SOUND: &str = "default";

/// Android accent color for a notification kind.
pub fn color_for(kind: &NotificationKind) -> &'static str {
    match kind {
        NotificationKind::ExpiringIngredient => "#FF9800",
        NotificationKind::TrackerReminder => "#4CAF50",
        NotificationKind::Education => "#2196F3",
        NotificationKind::Admin | NotificationKind::Other(_) => DEFAULT_COLOR,
    }
}

/// Resolve the priority override stored on a notification.
///
/// Only `"normal"` lowers the priority; anything else is delivered high.
pub fn priority_for(priority: Option<&str>) -> PushPriority {
    match priority.map(str::trim) {
        Some(p) if p.eq_ignore_ascii_case("normal") => PushPriority::Normal,
        _ => PushPriority::High,
    }
}

/// Build the hints attached to every message of `kind`.
pub fn platform_hints(kind: &NotificationKind, priority: Option<&str>, icon: &str) -> PlatformHints {
    PlatformHints {
        icon: icon.to_string(),
        color: color_for(kind).to_string(),
        badge: BADGE,
        sound: SOUND.to_string(),
        priority: priority_for(priority),
    }
}
