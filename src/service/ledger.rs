//! In-memory activity ledger.
//!
//! Holds activity records together with the demoted set and the under-review map behind
//! one `RwLock`, so membership changes and the record they relate to are updated together.
//! Persistence is the tracker's job.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::model::activity::{
    ActivityKind, ActivityStatus, ReviewEntry, UserActivityRecord, NEVER_SEEN_DAYS,
};

#[derive(Debug, Default)]
struct LedgerState {
    records: HashMap<u64, UserActivityRecord>,
    demoted: HashSet<u64>,
    under_review: HashMap<u64, ReviewEntry>,
}

/// Sizes of the ledger collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerCounts {
    pub tracked: usize,
    pub demoted: usize,
    pub under_review: usize,
}

#[derive(Clone, Default)]
pub struct ActivityLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        records: HashMap<u64, UserActivityRecord>,
        demoted: HashSet<u64>,
        under_review: HashMap<u64, ReviewEntry>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState {
                records,
                demoted,
                under_review,
            })),
        }
    }

    /// Counts one event for `user_id`, creating the record on first sight.
    ///
    /// A demoted user without a record starts out inactive, so their first message
    /// counts as a return.
    ///
    /// # Returns
    /// - `UserActivityRecord` - The record after the update
    pub async fn record_activity(
        &self,
        user_id: u64,
        kind: ActivityKind,
        now: DateTime<Utc>,
    ) -> UserActivityRecord {
        let mut state = self.state.write().await;
        let demoted = state.demoted.contains(&user_id);
        let record = state.records.entry(user_id).or_insert_with(|| {
            let mut record = UserActivityRecord::new(user_id, now);
            if demoted {
                record.status = ActivityStatus::Inactive;
            }
            record
        });
        record.record(kind, now);
        record.clone()
    }

    /// Whole days since the last recorded activity, or [`NEVER_SEEN_DAYS`].
    pub async fn days_inactive(&self, user_id: u64, now: DateTime<Utc>) -> i64 {
        self.state
            .read()
            .await
            .records
            .get(&user_id)
            .map(|record| record.days_inactive(now))
            .unwrap_or(NEVER_SEEN_DAYS)
    }

    pub async fn get(&self, user_id: u64) -> Option<UserActivityRecord> {
        self.state.read().await.records.get(&user_id).cloned()
    }

    /// Marks the user active as of `now` without counting an event.
    pub async fn reset(&self, user_id: u64, now: DateTime<Utc>) -> UserActivityRecord {
        let mut state = self.state.write().await;
        let record = state
            .records
            .entry(user_id)
            .or_insert_with(|| UserActivityRecord::new(user_id, now));
        record.last_active = now;
        record.status = ActivityStatus::Active;
        record.clone()
    }

    /// Sets the status of an existing record. Returns whether a record exists.
    pub async fn set_status(&self, user_id: u64, status: ActivityStatus) -> bool {
        match self.state.write().await.records.get_mut(&user_id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Sets the role an existing record was last observed with.
    pub async fn set_current_role(&self, user_id: u64, role_id: Option<u64>) -> bool {
        match self.state.write().await.records.get_mut(&user_id) {
            Some(record) => {
                record.current_role_id = role_id;
                true
            }
            None => false,
        }
    }

    pub async fn is_demoted(&self, user_id: u64) -> bool {
        self.state.read().await.demoted.contains(&user_id)
    }

    /// Returns whether the user was newly added.
    pub async fn mark_demoted(&self, user_id: u64) -> bool {
        self.state.write().await.demoted.insert(user_id)
    }

    /// Returns whether the user was in the set.
    pub async fn clear_demoted(&self, user_id: u64) -> bool {
        self.state.write().await.demoted.remove(&user_id)
    }

    pub async fn is_under_review(&self, user_id: u64) -> bool {
        self.state.read().await.under_review.contains_key(&user_id)
    }

    pub async fn review_entry(&self, user_id: u64) -> Option<ReviewEntry> {
        self.state.read().await.under_review.get(&user_id).cloned()
    }

    /// Puts the user under review unless they already are; the original entry is kept.
    ///
    /// Returns whether the user was newly added.
    pub async fn mark_under_review(&self, user_id: u64, entry: ReviewEntry) -> bool {
        let mut state = self.state.write().await;
        if state.under_review.contains_key(&user_id) {
            return false;
        }
        state.under_review.insert(user_id, entry);
        true
    }

    pub async fn clear_review(&self, user_id: u64) -> bool {
        self.state
            .write()
            .await
            .under_review
            .remove(&user_id)
            .is_some()
    }

    /// Drops the record and both memberships. Returns whether anything was removed.
    pub async fn forget(&self, user_id: u64) -> bool {
        let mut state = self.state.write().await;
        let had_record = state.records.remove(&user_id).is_some();
        let was_demoted = state.demoted.remove(&user_id);
        let was_reviewed = state.under_review.remove(&user_id).is_some();
        had_record || was_demoted || was_reviewed
    }

    pub async fn counts(&self) -> LedgerCounts {
        let state = self.state.read().await;
        LedgerCounts {
            tracked: state.records.len(),
            demoted: state.demoted.len(),
            under_review: state.under_review.len(),
        }
    }

    /// Copies of the three collections, taken under one lock.
    pub async fn snapshot_parts(
        &self,
    ) -> (
        HashMap<u64, UserActivityRecord>,
        HashSet<u64>,
        HashMap<u64, ReviewEntry>,
    ) {
        let state = self.state.read().await;
        (
            state.records.clone(),
            state.demoted.clone(),
            state.under_review.clone(),
        )
    }
}
