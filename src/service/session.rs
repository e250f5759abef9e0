//! Registry of open vote sessions.
//!
//! The map is guarded by a `RwLock` and every session by its own `Mutex`. Opening is a
//! check-and-insert under the write lock, so a member never has two open sessions of the
//! same kind. Casting locks only the session, so votes on different sessions proceed in
//! parallel while two votes on one session are serialized.
//!
//! Lock order: a session mutex is never held while acquiring the map lock.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::model::{
    action::ModerationAction,
    vote::{PromptRef, RejectReason, SessionKey, SessionKind, VoteOutcome, VoteSession},
};

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionKey, Arc<Mutex<VoteSession>>>>,
    admin_role_ids: Vec<u64>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// - `admin_role_ids` - Voters must hold at least one of these roles
    pub fn new(admin_role_ids: Vec<u64>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            admin_role_ids,
        }
    }

    /// Re-registers sessions loaded from storage. Closed sessions are skipped.
    pub async fn restore<I>(&self, sessions: I)
    where
        I: IntoIterator<Item = VoteSession>,
    {
        let mut map = self.sessions.write().await;
        for session in sessions.into_iter().filter(VoteSession::is_open) {
            map.insert(session.key(), Arc::new(Mutex::new(session)));
        }
    }

    /// Opens a session unless one of the same kind is already open for the member.
    ///
    /// # Returns
    /// - `Some(VoteSession)` - The newly opened session
    /// - `None` - A session for this kind and member is already open
    pub async fn open(
        &self,
        kind: SessionKind,
        target_user_id: u64,
        quorum: usize,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Option<VoteSession> {
        let key = SessionKey::new(kind, target_user_id);
        let mut map = self.sessions.write().await;
        if map.contains_key(&key) {
            return None;
        }

        let session = VoteSession::open(kind, target_user_id, quorum, now, timeout);
        map.insert(key, Arc::new(Mutex::new(session.clone())));
        tracing::debug!("Opened {} session", key);
        Some(session)
    }

    pub async fn has_open(&self, key: &SessionKey) -> bool {
        self.sessions.read().await.contains_key(key)
    }

    /// Copies of every open session.
    pub async fn open_sessions(&self) -> Vec<VoteSession> {
        let entries: Vec<_> = self.sessions.read().await.values().cloned().collect();

        let mut sessions = Vec::with_capacity(entries.len());
        for entry in entries {
            sessions.push(entry.lock().await.clone());
        }
        sessions
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Records where a session's prompt was posted.
    pub async fn set_prompt(&self, key: &SessionKey, prompt: PromptRef) -> bool {
        let Some(entry) = self.sessions.read().await.get(key).cloned() else {
            return false;
        };
        entry.lock().await.prompt = Some(prompt);
        true
    }

    /// Registers a vote.
    ///
    /// Authorization is checked before anything else; a rejected vote never changes a
    /// session. When the vote completes the quorum the session leaves the registry.
    ///
    /// # Arguments
    /// - `key` - Session being voted on
    /// - `voter_id` - Discord id of the voter
    /// - `voter_roles` - Role ids the voter holds
    /// - `option` - Chosen option
    /// - `now` - Time of the vote
    pub async fn cast_vote(
        &self,
        key: &SessionKey,
        voter_id: u64,
        voter_roles: &[u64],
        option: ModerationAction,
        now: DateTime<Utc>,
    ) -> VoteOutcome {
        if !voter_roles
            .iter()
            .any(|role| self.admin_role_ids.contains(role))
        {
            return VoteOutcome::Rejected(RejectReason::Unauthorized);
        }

        let Some(entry) = self.sessions.read().await.get(key).cloned() else {
            return VoteOutcome::Rejected(RejectReason::UnknownSession);
        };

        let (result, session) = {
            let mut session = entry.lock().await;
            let result = session.cast(voter_id, option, now);
            (result, session.clone())
        };

        match result {
            Err(reason) => VoteOutcome::Rejected(reason),
            Ok(None) => VoteOutcome::Recorded { session },
            Ok(Some(decision)) => {
                let mut map = self.sessions.write().await;
                if map.get(key).is_some_and(|current| Arc::ptr_eq(current, &entry)) {
                    map.remove(key);
                }
                VoteOutcome::Resolved { decision, session }
            }
        }
    }

    /// Removes a session regardless of its state.
    pub async fn remove(&self, key: &SessionKey) -> Option<VoteSession> {
        let entry = self.sessions.write().await.remove(key)?;
        let session = entry.lock().await.clone();
        Some(session)
    }

    /// Removes every session targeting `user_id`.
    pub async fn remove_for_user(&self, user_id: u64) -> Vec<VoteSession> {
        let removed: Vec<_> = {
            let mut map = self.sessions.write().await;
            let keys: Vec<SessionKey> = map
                .keys()
                .filter(|key| key.user_id == user_id)
                .copied()
                .collect();
            keys.iter().filter_map(|key| map.remove(key)).collect()
        };

        let mut sessions = Vec::with_capacity(removed.len());
        for entry in removed {
            sessions.push(entry.lock().await.clone());
        }
        sessions
    }

    /// Expires and removes every open session past its deadline.
    ///
    /// # Returns
    /// - `Vec<VoteSession>` - The expired sessions, for disabling their prompts
    pub async fn expire_due(&self, now: DateTime<Utc>) -> Vec<VoteSession> {
        let entries: Vec<_> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(key, entry)| (*key, entry.clone()))
            .collect();

        let mut expired = Vec::new();
        for (key, entry) in entries {
            let mut session = entry.lock().await;
            if session.is_expired(now) && session.expire() {
                expired.push((key, entry.clone(), session.clone()));
            }
        }

        if !expired.is_empty() {
            let mut map = self.sessions.write().await;
            for (key, entry, _) in &expired {
                if map.get(key).is_some_and(|current| Arc::ptr_eq(current, entry)) {
                    map.remove(key);
                }
            }
        }

        expired.into_iter().map(|(_, _, session)| session).collect()
    }
}
