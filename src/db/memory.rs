use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{AccountStore, JournalStore, StoreError, StoreResult};
use crate::calendar::DateKey;
use crate::models::daily_log::{DailyLog, DailyLogFields};
use crate::models::news::NewsJournalEntry;
use crate::models::user::{NewUser, Session, User};

/// Process-local store used by tests and by runs without `DATABASE_URL`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Per user, keyed by date key so iteration is already ascending.
    logs: HashMap<Uuid, BTreeMap<DateKey, DailyLog>>,
    /// Records without an owner, waiting for `assign_orphans`.
    orphans: BTreeMap<DateKey, DailyLog>,
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn insert_orphan(&self, key: &DateKey, fields: &DailyLogFields) {
        let log = new_log(Uuid::nil(), key, fields, Utc::now());
        self.inner.write().await.orphans.insert(key.clone(), log);
    }
}

fn new_log(user_id: Uuid, key: &DateKey, fields: &DailyLogFields, now: DateTime<Utc>) -> DailyLog {
    DailyLog {
        id: Uuid::new_v4(),
        user_id,
        logical_date: key.clone(),
        mood: fields.mood,
        sleep_quality: fields.sleep_quality,
        energy_level: fields.energy_level,
        primary_activities: fields.primary_activities.clone(),
        mental_world_activities: fields.mental_world_activities.clone(),
        daily_life_activities: fields.daily_life_activities.clone(),
        notes: fields.notes.clone(),
        news_entries: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn apply(log: &mut DailyLog, fields: &DailyLogFields, now: DateTime<Utc>) {
    log.mood = fields.mood;
    log.sleep_quality = fields.sleep_quality;
    log.energy_level = fields.energy_level;
    log.primary_activities = fields.primary_activities.clone();
    log.mental_world_activities = fields.mental_world_activities.clone();
    log.daily_life_activities = fields.daily_life_activities.clone();
    log.notes = fields.notes.clone();
    log.updated_at = now;
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn find_by_key(&self, user_id: Uuid, key: &DateKey) -> StoreResult<Option<DailyLog>> {
        let inner = self.inner.read().await;
        Ok(inner.logs.get(&user_id).and_then(|l| l.get(key)).cloned())
    }

    async fn find_by_range(
        &self,
        user_id: Uuid,
        start: &DateKey,
        end: &DateKey,
    ) -> StoreResult<Vec<DailyLog>> {
        let inner = self.inner.read().await;
        let Some(logs) = inner.logs.get(&user_id) else {
            return Ok(Vec::new());
        };
        Ok(logs
            .values()
            .filter(|l| {
                l.logical_date.as_str() >= start.as_str() && l.logical_date.as_str() < end.as_str()
            })
            .cloned()
            .collect())
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<DailyLog>> {
        let inner = self.inner.read().await;
        Ok(inner
            .logs
            .get(&user_id)
            .map(|l| l.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let log = inner
            .logs
            .entry(user_id)
            .or_default()
            .entry(key.clone())
            .or_insert_with(|| new_log(user_id, key, fields, now));
        apply(log, fields, now);
        Ok(log.clone())
    }

    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let log = inner
            .logs
            .entry(user_id)
            .or_default()
            .entry(key.clone())
            .or_insert_with(|| new_log(user_id, key, fields, now));
        Ok(log.clone())
    }

    async fn replace_news_entries(
        &self,
        user_id: Uuid,
        key: &DateKey,
        entries: &[NewsJournalEntry],
    ) -> StoreResult<Option<DailyLog>> {
        let mut inner = self.inner.write().await;
        let Some(log) = inner.logs.get_mut(&user_id).and_then(|l| l.get_mut(key)) else {
            return Ok(None);
        };
        log.news_entries = entries.to_vec();
        log.updated_at = Utc::now();
        Ok(Some(log.clone()))
    }

    async fn assign_orphans(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let Inner { logs, orphans, .. } = &mut *inner;
        let owned = logs.entry(user_id).or_default();

        let mut moved = 0;
        orphans.retain(|key, orphan| {
            if owned.contains_key(key) {
                return true;
            }
            let mut log = orphan.clone();
            log.user_id = user_id;
            log.updated_at = Utc::now();
            owned.insert(key.clone(), log);
            moved += 1;
            false
        });
        Ok(moved)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .sessions
            .insert(token_hash.to_string(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<()> {
        self.inner.write().await.sessions.remove(token_hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_log::MentalWorldEntry;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    fn fields(mood: i32, notes: Option<&str>) -> DailyLogFields {
        DailyLogFields {
            mood,
            sleep_quality: 3,
            energy_level: 3,
            primary_activities: vec!["WORK".into()],
            mental_world_activities: vec![MentalWorldEntry {
                value: "BOOK".into(),
                detail: "Dune".into(),
            }],
            daily_life_activities: vec![],
            notes: notes.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_every_field() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let day = key("2024-06-01");

        let first = store.upsert(user, &day, &fields(2, Some("rainy"))).await.unwrap();
        let mut replacement = fields(5, None);
        replacement.mental_world_activities.clear();
        let second = store.upsert(user, &day, &replacement).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.mood, 5);
        assert_eq!(second.notes, None);
        assert!(second.mental_world_activities.is_empty());
        assert_eq!(store.list(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_range_is_half_open_and_sorted() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for raw in ["2024-07-01", "2024-06-15", "2024-05-31", "2024-06-01"] {
            store.upsert(user, &key(raw), &fields(3, None)).await.unwrap();
        }
        store
            .upsert(Uuid::new_v4(), &key("2024-06-10"), &fields(3, None))
            .await
            .unwrap();

        let logs = store
            .find_by_range(user, &key("2024-06-01"), &key("2024-07-01"))
            .await
            .unwrap();
        let keys: Vec<&str> = logs.iter().map(|l| l.logical_date.as_str()).collect();
        assert_eq!(keys, ["2024-06-01", "2024-06-15"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            email: "a@example.com".into(),
            username: "a".into(),
            password_hash: "x".into(),
        };
        store.create_user(new_user()).await.unwrap();
        assert!(matches!(
            store.create_user(new_user()).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_saved_form() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let day = key("2024-06-01");

        store.upsert(user, &day, &fields(5, Some("saved"))).await.unwrap();
        let kept = store
            .insert_if_absent(user, &day, &DailyLogFields::placeholder())
            .await
            .unwrap();
        assert_eq!(kept.mood, 5);
        assert_eq!(kept.notes.as_deref(), Some("saved"));

        let created = store
            .insert_if_absent(user, &key("2024-06-02"), &DailyLogFields::placeholder())
            .await
            .unwrap();
        assert_eq!(created.mood, 3);
        assert!(created.primary_activities.is_empty());
    }

    #[tokio::test]
    async fn test_assign_orphans_skips_days_already_owned() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.upsert(owner, &key("2024-06-02"), &fields(5, None)).await.unwrap();
        for raw in ["2024-06-01", "2024-06-02", "2024-06-03"] {
            store.insert_orphan(&key(raw), &fields(1, Some("old"))).await;
        }

        assert_eq!(store.assign_orphans(owner).await.unwrap(), 2);
        let logs = store.list(owner).await.unwrap();
        let moods: Vec<i32> = logs.iter().map(|l| l.mood).collect();
        assert_eq!(moods, [1, 5, 1]);
        assert!(logs.iter().all(|l| l.user_id == owner));

        // The clashing orphan stays behind and is never moved.
        assert_eq!(store.assign_orphans(owner).await.unwrap(), 0);
        assert_eq!(store.inner.read().await.orphans.len(), 1);
    }
}
