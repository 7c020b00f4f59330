use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::store::{AccountStore, JournalStore, StoreError, StoreResult};
use crate::calendar::DateKey;
use crate::models::daily_log::{DailyLog, DailyLogFields, MentalWorldEntry};
use crate::models::news::NewsJournalEntry;
use crate::models::user::{NewUser, Session, User};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DailyLogRow {
    id: Uuid,
    user_id: Option<Uuid>,
    logical_date: String,
    mood: i32,
    sleep_quality: i32,
    energy_level: i32,
    primary_activities: Vec<String>,
    mental_world_activities: Json<Vec<MentalWorldEntry>>,
    daily_life_activities: Vec<String>,
    notes: Option<String>,
    news_entries: Json<Vec<NewsJournalEntry>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DailyLogRow> for DailyLog {
    type Error = StoreError;

    fn try_from(row: DailyLogRow) -> Result<Self, Self::Error> {
        let logical_date = DateKey::parse(&row.logical_date)
            .map_err(|e| StoreError::Corrupt(format!("daily_logs {}: {e}", row.id)))?;
        let user_id = row
            .user_id
            .ok_or_else(|| StoreError::Corrupt(format!("daily_logs {} has no owner", row.id)))?;

        Ok(DailyLog {
            id: row.id,
            user_id,
            logical_date,
            mood: row.mood,
            sleep_quality: row.sleep_quality,
            energy_level: row.energy_level,
            primary_activities: row.primary_activities,
            mental_world_activities: row.mental_world_activities.0,
            daily_life_activities: row.daily_life_activities,
            notes: row.notes,
            news_entries: row.news_entries.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_logs(rows: Vec<DailyLogRow>) -> StoreResult<Vec<DailyLog>> {
    rows.into_iter().map(DailyLog::try_from).collect()
}

#[async_trait]
impl JournalStore for PgStore {
    async fn find_by_key(&self, user_id: Uuid, key: &DateKey) -> StoreResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            "SELECT * FROM daily_logs WHERE user_id = $1 AND logical_date = $2",
        )
        .bind(user_id)
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DailyLog::try_from).transpose()
    }

    async fn find_by_range(
        &self,
        user_id: Uuid,
        start: &DateKey,
        end: &DateKey,
    ) -> StoreResult<Vec<DailyLog>> {
        let rows = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT * FROM daily_logs
            WHERE user_id = $1 AND logical_date >= $2 AND logical_date < $3
            ORDER BY logical_date ASC
            "#,
        )
        .bind(user_id)
        .bind(start.as_str())
        .bind(end.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_logs(rows)
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<DailyLog>> {
        let rows = sqlx::query_as::<_, DailyLogRow>(
            "SELECT * FROM daily_logs WHERE user_id = $1 ORDER BY logical_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_logs(rows)
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog> {
        // Every form column comes from EXCLUDED: a save never merges with the old row.
        let row = sqlx::query_as::<_, DailyLogRow>(
            r#"
            INSERT INTO daily_logs (
                id, user_id, logical_date, mood, sleep_quality, energy_level,
                primary_activities, mental_world_activities, daily_life_activities, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, logical_date) DO UPDATE SET
                mood = EXCLUDED.mood,
                sleep_quality = EXCLUDED.sleep_quality,
                energy_level = EXCLUDED.energy_level,
                primary_activities = EXCLUDED.primary_activities,
                mental_world_activities = EXCLUDED.mental_world_activities,
                daily_life_activities = EXCLUDED.daily_life_activities,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(key.as_str())
        .bind(fields.mood)
        .bind(fields.sleep_quality)
        .bind(fields.energy_level)
        .bind(&fields.primary_activities)
        .bind(Json(&fields.mental_world_activities))
        .bind(&fields.daily_life_activities)
        .bind(&fields.notes)
        .fetch_one(&self.pool)
        .await?;

        DailyLog::try_from(row)
    }

    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        key: &DateKey,
        fields: &DailyLogFields,
    ) -> StoreResult<DailyLog> {
        // DO NOTHING returns no row on conflict; the existing one is read back.
        let inserted = sqlx::query_as::<_, DailyLogRow>(
            r#"
            INSERT INTO daily_logs (
                id, user_id, logical_date, mood, sleep_quality, energy_level,
                primary_activities, mental_world_activities, daily_life_activities, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, logical_date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(key.as_str())
        .bind(fields.mood)
        .bind(fields.sleep_quality)
        .bind(fields.energy_level)
        .bind(&fields.primary_activities)
        .bind(Json(&fields.mental_world_activities))
        .bind(&fields.daily_life_activities)
        .bind(&fields.notes)
        .fetch_optional(&self.pool)
        .await?;

        let row = match inserted {
            Some(row) => row,
            None => {
                sqlx::query_as::<_, DailyLogRow>(
                    "SELECT * FROM daily_logs WHERE user_id = $1 AND logical_date = $2",
                )
                .bind(user_id)
                .bind(key.as_str())
                .fetch_one(&self.pool)
                .await?
            }
        };

        DailyLog::try_from(row)
    }

    async fn replace_news_entries(
        &self,
        user_id: Uuid,
        key: &DateKey,
        entries: &[NewsJournalEntry],
    ) -> StoreResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            r#"
            UPDATE daily_logs SET news_entries = $3, updated_at = NOW()
            WHERE user_id = $1 AND logical_date = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(key.as_str())
        .bind(Json(entries))
        .fetch_optional(&self.pool)
        .await?;

        row.map(DailyLog::try_from).transpose()
    }

    async fn assign_orphans(&self, user_id: Uuid) -> StoreResult<u64> {
        // Skip orphans whose day the owner already logged; the unique key forbids both.
        let result = sqlx::query(
            r#"
            UPDATE daily_logs AS orphan SET user_id = $1, updated_at = NOW()
            WHERE orphan.user_id IS NULL
              AND NOT EXISTS (
                  SELECT 1 FROM daily_logs owned
                  WHERE owned.user_id = $1 AND owned.logical_date = orphan.logical_date
              )
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match created {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict("Email already registered".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        Ok(sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token_hash = $1")
                .bind(token_hash)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
