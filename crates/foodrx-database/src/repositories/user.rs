//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::result::AppResult;
use foodrx_core::types::{PageRequest, UserId};
use foodrx_entity::user::{User, UserContact};

use crate::store::UserStore;

/// Repository for reading users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn fetch_page(&self, page: PageRequest) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, fcm_token, created_at FROM users ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(page.limit))
        .bind(page.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn find_contact(&self, id: UserId) -> AppResult<Option<UserContact>> {
        sqlx::query_as::<_, UserContact>("SELECT id, name, fcm_token FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user contact", e)
            })
    }
}
