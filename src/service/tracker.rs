//! The inactivity tracker: ledger plus session registry plus the store they persist to.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    data::store::StateStore,
    error::AppError,
    model::{
        activity::{ActivityKind, UserActivityRecord},
        snapshot::TrackerSnapshot,
    },
    service::{ledger::ActivityLedger, session::SessionRegistry},
};

pub struct Tracker {
    pub ledger: ActivityLedger,
    pub sessions: SessionRegistry,
    store: StateStore,
    /// Activity writes since the last flush.
    pending: AtomicU32,
    flush_every: u32,
    flush_lock: Mutex<()>,
}

impl Tracker {
    /// Loads persisted state from `store`.
    ///
    /// # Arguments
    /// - `store` - Backend the state is loaded from and flushed to
    /// - `admin_role_ids` - Roles allowed to vote
    /// - `flush_every` - Activity writes between sampled flushes
    ///
    /// # Returns
    /// - `Ok(Tracker)` - Tracker holding the persisted ledger and open sessions
    /// - `Err(AppError)` - The SQL backend failed to load
    pub async fn load(
        store: StateStore,
        admin_role_ids: Vec<u64>,
        flush_every: u32,
    ) -> Result<Self, AppError> {
        let snapshot = store.load().await?;

        tracing::info!(
            "Loaded {} activity records, {} demoted, {} under review, {} open sessions",
            snapshot.records.len(),
            snapshot.demoted.len(),
            snapshot.under_review.len(),
            snapshot.sessions.len()
        );

        let sessions = SessionRegistry::new(admin_role_ids);
        sessions.restore(snapshot.sessions.into_values()).await;

        Ok(Self {
            ledger: ActivityLedger::from_parts(
                snapshot.records,
                snapshot.demoted,
                snapshot.under_review,
            ),
            sessions,
            store,
            pending: AtomicU32::new(0),
            flush_every: flush_every.max(1),
            flush_lock: Mutex::new(()),
        })
    }

    /// Records activity and flushes once every `flush_every` writes.
    ///
    /// A failed sampled flush is logged; the next flush retries with the full state.
    pub async fn record_activity(
        &self,
        user_id: u64,
        kind: ActivityKind,
        now: DateTime<Utc>,
    ) -> UserActivityRecord {
        let record = self.ledger.record_activity(user_id, kind, now).await;

        let pending = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
        if pending >= self.flush_every {
            if let Err(e) = self.persist().await {
                tracing::error!("Failed to flush activity ledger: {}", e);
            }
        }

        record
    }

    /// Current ledger state and open sessions.
    pub async fn snapshot(&self) -> TrackerSnapshot {
        let (records, demoted, under_review) = self.ledger.snapshot_parts().await;
        let sessions = self
            .sessions
            .open_sessions()
            .await
            .into_iter()
            .filter(|session| session.is_open())
            .map(|session| (session.key(), session))
            .collect();

        TrackerSnapshot {
            records,
            demoted,
            under_review,
            sessions,
        }
    }

    /// Writes the full state to the store.
    pub async fn persist(&self) -> Result<(), AppError> {
        let _guard = self.flush_lock.lock().await;
        self.pending.store(0, Ordering::SeqCst);

        let snapshot = self.snapshot().await;
        self.store.save(&snapshot).await?;

        tracing::debug!("Persisted {} activity records", snapshot.records.len());
        Ok(())
    }
}
