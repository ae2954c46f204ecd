//! User entity model.

use chrono::{DateTime, Utc};
use foodrx_core::types::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An application user, as seen by the notification pipeline.
///
/// Users are owned by the main application; this crate only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: Option<String>,
    /// Device registration token. Absent means the user cannot be reached.
    pub fcm_token: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project the fields needed for delivery.
    pub fn contact(&self) -> UserContact {
        UserContact {
            id: self.id,
            name: self.name.clone(),
            fcm_token: self.fcm_token.clone(),
        }
    }
}

/// Token projection of a user used by the delivery engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserContact {
    /// The user.
    pub id: UserId,
    /// Display name.
    pub name: Option<String>,
    /// Device registration token.
    pub fcm_token: Option<String>,
}

impl UserContact {
    /// The token to deliver to, ignoring blank values.
    pub fn deliverable_token(&self) -> Option<&str> {
        self.fcm_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
