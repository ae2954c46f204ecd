//! Pantry item entity model.

use chrono::{DateTime, Utc};
use foodrx_core::types::{PantryItemId, UserId};
use serde::{Deserialize, Serialize};

use super::expiry::ExpiryDate;

/// A pantry item with its expiry already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    /// Unique item identifier.
    pub id: PantryItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Item name as entered by the user.
    pub name: String,
    /// Normalized expiry. `None` when missing or unparseable.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PantryItem {
    /// Build an item from its stored expiry representation.
    pub fn from_stored(
        id: PantryItemId,
        user_id: UserId,
        name: impl Into<String>,
        expiry: Option<ExpiryDate>,
    ) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            expires_at: expiry.and_then(|e| e.normalize()),
        }
    }

    /// Whether the item expires within `[from, to]`, both inclusive.
    pub fn expires_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at >= from && at <= to)
    }
}
