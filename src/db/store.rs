//! Storage seams consumed by the handlers.
//!
//! Both traits are object safe (`async_trait`) so the application state can hold
//! `Arc<dyn JournalStore>` and swap PostgreSQL for the in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::calendar::DateKey;
use crate::models::daily_log::{DailyLog, DailyLogFields};
use crate::models::news::NewsJournalEntry;
use crate::models::user::{NewUser, Session, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("stored row is corrupt: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Daily records keyed by `(user, date key)`.
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn find_by_key(&self, user_id: Uuid, key: &DateKey) -> StoreResult<Option<DailyLog>>;

    /// Records with `start <= key < end`, ascending by key.
    async fn find_by_range(
        &self,
        user_id: Uuid,
        start: &DateKey,
        end: &DateKey,
    ) -> StoreResult<Vec<DailyLog>>;

    /// Every record of the user, ascending by key.
    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<DailyLog>>;

    /// Create the day's record or replace all of its form fields. News entries
    /// of an existing record are kept.
    async fn upsert(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog>;

    /// Create the day's record from `fields` unless one exists. An existing
    /// record is returned untouched.
    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog>;

    async fn replace_news_entries(
        &self,
        user_id: Uuid,
        key: &DateKey,
        entries: &[NewsJournalEntry],
    ) -> StoreResult<Option<DailyLog>>;

    /// Attach records without an owner to `user_id`. Returns how many moved.
    async fn assign_orphans(&self, user_id: Uuid) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session>;

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>>;

    async fn delete_session(&self, token_hash: &str) -> StoreResult<()>;
}
