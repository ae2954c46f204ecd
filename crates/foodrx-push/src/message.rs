//! Push payload construction.

use std::collections::BTreeMap;

use foodrx_core::traits::push::PushMessage;
use foodrx_entity::notification::Notification;

use crate::hints::platform_hints;

/// Build the message delivering `notification` to `token`.
///
/// The data payload carries the notification id and its type tag so the
/// app can route the tap.
pub fn build_message(notification: &Notification, token: &str, icon: &str) -> PushMessage {
    let mut data = BTreeMap::new();
    data.insert("notificationId".to_string(), notification.id.to_string());
    data.insert("type".to_string(), notification.kind.as_str().to_string());

    PushMessage {
        token: token.to_string(),
        title: notification.title.clone(),
        body: notification.message.clone(),
        data,
        hints: platform_hints(&notification.kind, notification.priority.as_deref(), icon),
    }
}
