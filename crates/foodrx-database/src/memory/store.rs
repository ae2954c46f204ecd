//! State and trait impls for [`MemoryStore`].

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use foodrx_core::error::AppError;
use foodrx_core::result::AppResult;
use foodrx_core::types::{KeysetPage, NotificationId, PageRequest, PantryItemId, UserId};
use foodrx_entity::notification::{NewNotification, Notification, NotificationAnalyticsEvent};
use foodrx_entity::pantry::{ExpiryDate, PantryItem};
use foodrx_entity::tracker::{TrackerGoal, TrackerProgressRecord};
use foodrx_entity::user::{User, UserContact};

use crate::store::{
    AnalyticsSink, NotificationStore, PantryStore, TrackerStore, UpsertOutcome, UserStore,
};

/// An operation that should fail with a database error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Every user page fetch.
    UserPage,
    /// Counting pending notifications.
    CountPending,
    /// Every pending page fetch.
    FetchPending,
    /// Pantry lookups for one user.
    Pantry(UserId),
    /// Contact lookups for one user.
    Contact(UserId),
    /// Marking one notification as sent.
    MarkSent(NotificationId),
    /// Snapshot inserts for one user.
    InsertProgress(UserId),
    /// Goal resets for one user.
    ResetGoals(UserId),
    /// Every analytics write.
    Analytics,
}

#[derive(Debug, Clone)]
struct StoredPantryItem {
    id: PantryItemId,
    user_id: UserId,
    name: String,
    expiry: Option<ExpiryDate>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    pantry: Vec<StoredPantryItem>,
    goals: Vec<TrackerGoal>,
    progress: Vec<TrackerProgressRecord>,
    notifications: BTreeMap<NotificationId, Notification>,
    analytics: Vec<NotificationAnalyticsEvent>,
    faults: HashSet<Fault>,
    pending_fetches: u32,
}

impl State {
    fn check(&self, fault: &Fault) -> AppResult<()> {
        if self.faults.contains(fault) {
            return Err(AppError::database(format!("Injected fault: {fault:?}")));
        }
        Ok(())
    }

    fn find_daily(&mut self, new: &NewNotification, day: NaiveDate) -> Option<&mut Notification> {
        self.notifications
            .values_mut()
            .find(|n| n.user_id == new.user_id && n.kind == new.kind && n.digest_day == Some(day))
    }

    fn push(&mut self, notification: Notification) {
        self.notifications.insert(notification.id, notification);
    }
}

/// Store holding every collection in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user and return its id.
    pub async fn add_user(&self, name: &str, fcm_token: Option<&str>) -> UserId {
        let user = User {
            id: UserId::new(),
            name: Some(name.to_string()),
            fcm_token: fcm_token.map(str::to_string),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.state.write().await.users.insert(id, user);
        id
    }

    /// Add a pantry item with its expiry as stored.
    pub async fn add_pantry_item(
        &self,
        user_id: UserId,
        name: &str,
        expiry: Option<ExpiryDate>,
    ) -> PantryItemId {
        let id = PantryItemId::new();
        self.state.write().await.pantry.push(StoredPantryItem {
            id,
            user_id,
            name: name.to_string(),
            expiry,
        });
        id
    }

    /// Add a tracker goal.
    pub async fn add_goal(&self, goal: TrackerGoal) {
        self.state.write().await.goals.push(goal);
    }

    /// Add a progress snapshot.
    pub async fn add_progress(&self, record: TrackerProgressRecord) {
        self.state.write().await.progress.push(record);
    }

    /// Add a notification as-is.
    pub async fn add_notification(&self, notification: Notification) {
        self.state.write().await.push(notification);
    }

    /// Make an operation fail until cleared.
    pub async fn inject(&self, fault: Fault) {
        self.state.write().await.faults.insert(fault);
    }

    /// Stop failing an operation.
    pub async fn clear(&self, fault: &Fault) {
        self.state.write().await.faults.remove(fault);
    }

    /// All notifications, ordered by id.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.values().cloned().collect()
    }

    /// One notification by id.
    pub async fn notification(&self, id: NotificationId) -> Option<Notification> {
        self.state.read().await.notifications.get(&id).cloned()
    }

    /// All tracker goals.
    pub async fn goals(&self) -> Vec<TrackerGoal> {
        self.state.read().await.goals.clone()
    }

    /// All progress snapshots.
    pub async fn progress(&self) -> Vec<TrackerProgressRecord> {
        self.state.read().await.progress.clone()
    }

    /// All analytics events.
    pub async fn analytics(&self) -> Vec<NotificationAnalyticsEvent> {
        self.state.read().await.analytics.clone()
    }

    /// Number of pending-page fetches served so far.
    pub async fn pending_fetches(&self) -> u32 {
        self.state.read().await.pending_fetches
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn fetch_page(&self, page: PageRequest) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        state.check(&Fault::UserPage)?;
        Ok(state
            .users
            .values()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_contact(&self, id: UserId) -> AppResult<Option<UserContact>> {
        let state = self.state.read().await;
        state.check(&Fault::Contact(id))?;
        Ok(state.users.get(&id).map(User::contact))
    }
}

#[async_trait]
impl PantryStore for MemoryStore {
    async fn find_expiring(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<PantryItem>> {
        let state = self.state.read().await;
        state.check(&Fault::Pantry(user_id))?;
        Ok(state
            .pantry
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| PantryItem::from_stored(p.id, p.user_id, p.name.clone(), p.expiry.clone()))
            .filter(|item| item.expires_between(from, to))
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn upsert_daily_digest(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<UpsertOutcome> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.find_daily(&new, day) {
            existing.title = new.title;
            existing.message = new.message;
            existing.updated_at = now;
            return Ok(UpsertOutcome::Updated);
        }
        state.push(new.into_notification(Some(day), now));
        Ok(UpsertOutcome::Inserted)
    }

    async fn insert_once_per_day(
        &self,
        new: NewNotification,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.find_daily(&new, day).is_some() {
            return Ok(false);
        }
        state.push(new.into_notification(Some(day), now));
        Ok(true)
    }

    async fn insert(&self, new: NewNotification, now: DateTime<Utc>) -> AppResult<Notification> {
        let notification = new.into_notification(None, now);
        self.state.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.write().await;
        state.check(&Fault::MarkSent(id))?;
        match state.notifications.get_mut(&id) {
            Some(n) if n.sent_at.is_none() => {
                n.sent_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn fetch_pending(
        &self,
        page: &KeysetPage<NotificationId>,
    ) -> AppResult<Vec<Notification>> {
        let mut state = self.state.write().await;
        state.check(&Fault::FetchPending)?;
        state.pending_fetches += 1;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.is_pending())
            .filter(|n| page.after.is_none_or(|after| n.id > after))
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_pending(&self) -> AppResult<u64> {
        let state = self.state.read().await;
        state.check(&Fault::CountPending)?;
        Ok(state.notifications.values().filter(|n| n.is_pending()).count() as u64)
    }
}

#[async_trait]
impl TrackerStore for MemoryStore {
    async fn has_progress_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .progress
            .iter()
            .any(|p| p.user_id == user_id && p.progress_date >= from && p.progress_date < to))
    }

    async fn find_goals(&self, user_id: UserId, weekly: bool) -> AppResult<Vec<TrackerGoal>> {
        let state = self.state.read().await;
        Ok(state
            .goals
            .iter()
            .filter(|g| g.user_id == user_id && g.is_weekly_goal == weekly)
            .cloned()
            .collect())
    }

    async fn insert_progress(&self, records: &[TrackerProgressRecord]) -> AppResult<u64> {
        let mut state = self.state.write().await;
        for user_id in records.iter().map(|r| r.user_id) {
            state.check(&Fault::InsertProgress(user_id))?;
        }
        state.progress.extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn reset_goals(
        &self,
        user_id: UserId,
        weekly: bool,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        state.check(&Fault::ResetGoals(user_id))?;
        let mut count = 0;
        for goal in state
            .goals
            .iter_mut()
            .filter(|g| g.user_id == user_id && g.is_weekly_goal == weekly)
        {
            goal.current_value = 0.0;
            goal.last_updated = Some(at);
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl AnalyticsSink for MemoryStore {
    async fn record(&self, event: &NotificationAnalyticsEvent) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check(&Fault::Analytics)?;
        state.analytics.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use foodrx_entity::notification::NotificationKind;

    fn digest(user_id: UserId, title: &str) -> NewNotification {
        NewNotification::new(user_id, NotificationKind::ExpiringIngredient, title, "body")
    }

    #[tokio::test]
    async fn test_upsert_daily_digest_keeps_identity() {
        let store = MemoryStore::new();
        let user = store.add_user("Ana", Some("tok")).await;
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let now = Utc::now();

        let first = store.upsert_daily_digest(digest(user, "one"), day, now).await.unwrap();
        let id = store.notifications().await[0].id;
        let second = store
            .upsert_daily_digest(digest(user, "two"), day, now + Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);
        let all = store.notifications().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].title, "two");
    }

    #[tokio::test]
    async fn test_next_day_gets_new_record() {
        let store = MemoryStore::new();
        let user = store.add_user("Ana", None).await;
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let now = Utc::now();

        store.upsert_daily_digest(digest(user, "a"), day, now).await.unwrap();
        let outcome = store
            .upsert_daily_digest(digest(user, "b"), day.succ_opt().unwrap(), now)
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.notifications().await.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_pending_skips_sent_and_seen() {
        let store = MemoryStore::new();
        let user = store.add_user("Ana", None).await;
        let now = Utc::now();
        let mut ids = Vec::new();
        for i in 0..4 {
            let n = store
                .insert(
                    NewNotification::new(user, NotificationKind::Admin, format!("t{i}"), "m"),
                    now,
                )
                .await
                .unwrap();
            ids.push(n.id);
        }
        assert!(store.mark_sent(ids[1], now).await.unwrap());
        assert!(!store.mark_sent(ids[1], now).await.unwrap());

        let page = KeysetPage { after: Some(ids[0]), limit: 10 };
        let pending = store.fetch_pending(&page).await.unwrap();
        let got: Vec<_> = pending.iter().map(|n| n.id).collect();
        assert_eq!(got, vec![ids[2], ids[3]]);
        assert_eq!(store.count_pending().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_injected_fault() {
        let store = MemoryStore::new();
        store.inject(Fault::UserPage).await;
        assert!(store.fetch_page(PageRequest { offset: 0, limit: 10 }).await.is_err());
        store.clear(&Fault::UserPage).await;
        assert!(store.fetch_page(PageRequest { offset: 0, limit: 10 }).await.is_ok());
    }
}
