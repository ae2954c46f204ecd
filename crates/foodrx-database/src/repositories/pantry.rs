//! Pantry item repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::result::AppResult;
use foodrx_core::types::{PantryItemId, UserId};
use foodrx_entity::pantry::{ExpiryDate, PantryItem};

use crate::store::PantryStore;

/// Raw pantry row with both expiry columns.
#[derive(Debug, FromRow)]
struct PantryRow {
    id: PantryItemId,
    user_id: UserId,
    name: String,
    expiry_at: Option<DateTime<Utc>>,
    expiry_text: Option<String>,
}

impl PantryRow {
    fn into_item(self) -> PantryItem {
        let expiry = self
            .expiry_at
            .map(ExpiryDate::Timestamp)
            .or(self.expiry_text.map(ExpiryDate::Text));
        PantryItem::from_stored(self.id, self.user_id, self.name, expiry)
    }
}

/// Repository for reading pantry items.
#[derive(Debug, Clone)]
pub struct PantryRepository {
    pool: PgPool,
}

impl PantryRepository {
    /// Create a new pantry repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PantryStore for PantryRepository {
    async fn find_expiring(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<PantryItem>> {
        // Text expiries cannot be range-filtered in SQL; they are parsed here.
        let rows = sqlx::query_as::<_, PantryRow>(
            "SELECT id, user_id, name, expiry_at, expiry_text FROM pantry_items \
             WHERE user_id = $1 \
               AND ((expiry_at IS NOT NULL AND expiry_at BETWEEN $2 AND $3) \
                 OR (expiry_at IS NULL AND expiry_text IS NOT NULL))",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find expiring items", e)
        })?;

        Ok(rows
            .into_iter()
            .map(PantryRow::into_item)
            .filter(|item| item.expires_between(from, to))
            .collect())
    }
}
