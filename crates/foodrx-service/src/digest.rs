//! Expiring-ingredient digest wording.

use serde::{Deserialize, Serialize};

use foodrx_entity::pantry::PantryItem;

/// Names listed before the remainder is summarized as "and N more".
const MAX_LISTED: usize = 3;

/// Title and body of a digest notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestContent {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
}

/// Summarize expiring items into one notification.
///
/// Items are listed soonest first, ties broken by name. Returns `None` for
/// an empty slice.
pub fn compose_expiring_digest(items: &[PantryItem]) -> Option<DigestContent> {
    let mut sorted: Vec<&PantryItem> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.expires_at
            .cmp(&b.expires_at)
            .then_with(|| a.name.cmp(&b.name))
    });

    match sorted.as_slice() {
        [] => None,
        [only] => Some(DigestContent {
            title: format!("{} expires soon", only.name),
            message: format!(
                "Your {} expires soon. Consider using it in a recipe today!",
                only.name
            ),
        }),
        many => {
            let names: Vec<&str> = many
                .iter()
                .take(MAX_LISTED)
                .map(|i| i.name.as_str())
                .collect();
            let mut message = format!("Expiring soon: {}", names.join(", "));
            if many.len() > MAX_LISTED {
                message.push_str(&format!(" and {} more", many.len() - MAX_LISTED));
            }
            Some(DigestContent {
                title: format!("{} items expiring soon", many.len()),
                message,
            })
        }
    }
}
