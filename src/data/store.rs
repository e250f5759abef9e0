//! Persistence backend for the tracker snapshot.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    config::StorageBackend,
    data::{
        json_store::JsonStateStore, membership::MembershipRepository, poll::PollRepository,
        user_activity::UserActivityRepository,
    },
    error::AppError,
    model::snapshot::TrackerSnapshot,
};

/// Where the ledger, membership sets and open sessions live.
pub enum StateStore {
    Json(JsonStateStore),
    Sql(DatabaseConnection),
}

impl StateStore {
    /// Picks the store for the configured backend.
    pub fn for_backend(
        backend: StorageBackend,
        data_dir: &std::path::Path,
        db: &DatabaseConnection,
    ) -> Self {
        match backend {
            StorageBackend::Json => Self::Json(JsonStateStore::new(data_dir)),
            StorageBackend::Sqlite => Self::Sql(db.clone()),
        }
    }

    /// Loads the persisted snapshot.
    ///
    /// # Returns
    /// - `Ok(TrackerSnapshot)` - Loaded state; JSON loading recovers from corrupt files
    /// - `Err(AppError)` - SQL query failed or a row could not be converted
    pub async fn load(&self) -> Result<TrackerSnapshot, AppError> {
        match self {
            Self::Json(store) => Ok(store.load().await),
            Self::Sql(db) => {
                let records = UserActivityRepository::new(db).get_all().await?;
                let membership = MembershipRepository::new(db);
                let sessions = PollRepository::new(db).get_open().await?;

                Ok(TrackerSnapshot {
                    records: records.into_iter().map(|r| (r.user_id, r)).collect(),
                    demoted: membership.get_demoted().await?,
                    under_review: membership.get_under_review().await?,
                    sessions: sessions.into_iter().map(|s| (s.key(), s)).collect(),
                })
            }
        }
    }

    /// Writes the snapshot. The SQL variant replaces all four tables in one transaction.
    pub async fn save(&self, snapshot: &TrackerSnapshot) -> Result<(), AppError> {
        match self {
            Self::Json(store) => store.save(snapshot).await,
            Self::Sql(db) => {
                let txn = db.begin().await?;

                UserActivityRepository::new(&txn)
                    .replace_all(snapshot.records.values().cloned())
                    .await?;
                let membership = MembershipRepository::new(&txn);
                membership.replace_demoted(&snapshot.demoted).await?;
                membership
                    .replace_under_review(&snapshot.under_review)
                    .await?;
                PollRepository::new(&txn)
                    .replace_all(snapshot.sessions.values())
                    .await?;

                txn.commit().await?;
                Ok(())
            }
        }
    }
}
