//! One-off startup steps.

use crate::auth::password::hash_password;
use crate::db::{AccountStore, JournalStore};
use crate::error::AppResult;
use crate::models::user::NewUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyAdoption {
    /// `LEGACY_OWNER_EMAIL` is not set.
    Disabled,
    /// The owner account is missing and no password was given to create it.
    Skipped,
    Adopted { user_created: bool, records: u64 },
}

/// Give records written before accounts existed to the configured owner.
///
/// Safe to run on every start: once no ownerless rows remain it moves nothing.
pub async fn adopt_legacy_records(
    accounts: &dyn AccountStore,
    journal: &dyn JournalStore,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<LegacyAdoption> {
    let Some(email) = email else {
        return Ok(LegacyAdoption::Disabled);
    };

    let (owner, user_created) = match accounts.find_user_by_email(email).await? {
        Some(user) => (user, false),
        None => {
            let Some(password) = password else {
                tracing::warn!(email, "Legacy owner does not exist and LEGACY_OWNER_PASSWORD is unset, skipping adoption");
                return Ok(LegacyAdoption::Skipped);
            };
            let username = email.split('@').next().unwrap_or(email).to_string();
            let user = accounts
                .create_user(NewUser {
                    email: email.to_string(),
                    username,
                    password_hash: hash_password(password)?,
                })
                .await?;
            tracing::info!(user_id = %user.id, "Created legacy owner account");
            (user, true)
        }
    };

    let records = journal.assign_orphans(owner.id).await?;
    if records > 0 {
        tracing::info!(user_id = %owner.id, records, "Adopted ownerless daily logs");
    }

    Ok(LegacyAdoption::Adopted {
        user_created,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DateKey;
    use crate::db::MemoryStore;
    use crate::models::daily_log::DailyLogFields;

    #[tokio::test]
    async fn test_disabled_without_email() {
        let store = MemoryStore::new();
        let result = adopt_legacy_records(&store, &store, None, Some("pw")).await.unwrap();
        assert_eq!(result, LegacyAdoption::Disabled);
    }

    #[tokio::test]
    async fn test_skipped_without_password() {
        let store = MemoryStore::new();
        let result = adopt_legacy_records(&store, &store, Some("me@example.com"), None)
            .await
            .unwrap();
        assert_eq!(result, LegacyAdoption::Skipped);
        assert!(store.find_user_by_email("me@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_adopts_orphans_once() {
        let store = MemoryStore::new();
        for raw in ["2024-06-01", "2024-06-02"] {
            store
                .insert_orphan(&DateKey::parse(raw).unwrap(), &DailyLogFields::placeholder())
                .await;
        }

        let first = adopt_legacy_records(&store, &store, Some("me@example.com"), Some("secret1"))
            .await
            .unwrap();
        let second = adopt_legacy_records(&store, &store, Some("me@example.com"), Some("secret1"))
            .await
            .unwrap();

        assert_eq!(
            first,
            LegacyAdoption::Adopted {
                user_created: true,
                records: 2
            }
        );
        assert_eq!(
            second,
            LegacyAdoption::Adopted {
                user_created: false,
                records: 0
            }
        );

        let owner = store
            .find_user_by_email("me@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.list(owner.id).await.unwrap().len(), 2);
    }
}
