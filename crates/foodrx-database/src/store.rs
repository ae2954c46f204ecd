//! Store traits the pipeline engines are written against.
//!
//! Each trait covers one collection. [`Stores`] bundles one implementation
//! of each, either the PostgreSQL repositories or a shared [`MemoryStore`].

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use foodrx_core::result::AppResult;
use foodrx_core::types::{KeysetPage, NotificationId, PageRequest, UserId};
use foodrx_entity::notification::{NewNotification, Notification, NotificationAnalyticsEvent};
use foodrx_entity::pantry::PantryItem;
use foodrx_entity::tracker::{TrackerGoal, TrackerProgressRecord};
use foodrx_entity::user::{User, UserContact};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    AnalyticsRepository, NotificationRepository, PantryRepository, TrackerRepository,
    UserRepository,
};

/// Result of a per-day digest upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the day; one was created.
    Inserted,
    /// The day's record existed; its content was replaced.
    Updated,
}

/// Read access to the user population.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Fetch one page of users ordered by id.
    async fn fetch_page(&self, page: PageRequest) -> AppResult<Vec<User>>;

    /// Project a user's delivery contact, if the user exists.
    async fn find_contact(&self, id: UserId) -> AppResult<Option<UserContact>>;
}

/// Read access to pantry items.
#[async_trait]
pub trait PantryStore: Send + Sync + Debug + 'static {
    /// Items of `user_id` whose normalized expiry lies in `[from, to]`.
    async fn find_expiring(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<PantryItem>>;
}

/// The notification queue.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug + 'static {
    /// Insert the day's digest, or replace its title and message.
    ///
    /// Keyed by `(user, kind, day)` and atomic with respect to concurrent
    /// callers.
    async fn upsert_daily_digest(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<UpsertOutcome>;

    /// Insert unless a record for `(user, kind, day)` exists.
    ///
    /// Returns `true` when a record was inserted.
    async fn insert_once_per_day(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Insert a notification unconditionally.
    async fn insert(&self, new: NewNotification, now: DateTime<Utc>) -> AppResult<Notification>;

    /// Stamp `sent_at` on a pending notification.
    ///
    /// Returns `false` if the notification was missing or already sent.
    async fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<bool>;

    /// Pending notifications after the page key, ordered by id.
    async fn fetch_pending(&self, page: &KeysetPage<NotificationId>)
    -> AppResult<Vec<Notification>>;

    /// Number of pending notifications.
    async fn count_pending(&self) -> AppResult<u64>;
}

/// Tracker goals and progress snapshots.
#[async_trait]
pub trait TrackerStore: Send + Sync + Debug + 'static {
    /// Whether any progress snapshot of `user_id` falls in `[from, to)`.
    async fn has_progress_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Goals of `user_id` with the given weekly flag.
    async fn find_goals(&self, user_id: UserId, weekly: bool) -> AppResult<Vec<TrackerGoal>>;

    /// Insert snapshots. Either all are written or none.
    async fn insert_progress(&self, records: &[TrackerProgressRecord]) -> AppResult<u64>;

    /// Zero the counters of the user's matching goals.
    async fn reset_goals(&self, user_id: UserId, weekly: bool, at: DateTime<Utc>)
    -> AppResult<u64>;
}

/// Write-only delivery analytics.
#[async_trait]
pub trait AnalyticsSink: Send + Sync + Debug + 'static {
    /// Append one event.
    async fn record(&self, event: &NotificationAnalyticsEvent) -> AppResult<()>;
}

/// One implementation of every store, shared by the engines.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Pantry items.
    pub pantry: Arc<dyn PantryStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
    /// Tracker goals and progress.
    pub trackers: Arc<dyn TrackerStore>,
    /// Delivery analytics.
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl Stores {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            pantry: Arc::new(PantryRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            trackers: Arc::new(TrackerRepository::new(pool.clone())),
            analytics: Arc::new(AnalyticsRepository::new(pool)),
        }
    }

    /// Every store backed by the same in-memory state.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            pantry: store.clone(),
            notifications: store.clone(),
            trackers: store.clone(),
            analytics: store,
        }
    }
}
