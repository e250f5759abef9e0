use std::sync::Arc;

use super::*;
use crate::{
    model::vote::{PromptRef, RejectReason, VoteSession},
    service::session::SessionRegistry,
};

fn registry() -> SessionRegistry {
    SessionRegistry::new(vec![ADMIN_ROLE])
}

async fn find(registry: &SessionRegistry, key: &SessionKey) -> Option<VoteSession> {
    registry
        .open_sessions()
        .await
        .into_iter()
        .find(|session| session.key() == *key)
}

/// Tests that a member gets at most one open session per kind.
///
/// Expected: second open of the same kind returns None, other kinds open fine
#[tokio::test]
async fn one_open_session_per_kind() {
    let registry = registry();
    let now = Utc::now();

    assert!(registry
        .open(SessionKind::Ghost, 1, 1, now, Duration::hours(24))
        .await
        .is_some());
    assert!(registry
        .open(SessionKind::Ghost, 1, 1, now, Duration::hours(24))
        .await
        .is_none());
    assert!(registry
        .open(SessionKind::FinalReview, 1, 2, now, Duration::hours(24))
        .await
        .is_some());
    assert_eq!(registry.len().await, 2);
}

/// Tests that concurrent opens for the same member create a single session.
///
/// Expected: exactly one of the tasks succeeds
#[tokio::test]
async fn concurrent_opens_are_deduplicated() {
    let registry = Arc::new(registry());
    let now = Utc::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .open(SessionKind::Demotion, 7, 2, now, Duration::hours(24))
                    .await
                    .is_some()
            })
        })
        .collect();

    let mut opened = 0;
    for handle in handles {
        if handle.await.unwrap() {
            opened += 1;
        }
    }
    assert_eq!(opened, 1);
}

/// Tests that non-admins cannot vote.
///
/// Expected: Rejected(Unauthorized), session untouched
#[tokio::test]
async fn rejects_unauthorized_voter() {
    let registry = registry();
    let now = Utc::now();
    registry
        .open(SessionKind::Ghost, 1, 1, now, Duration::hours(24))
        .await;
    let key = SessionKey::new(SessionKind::Ghost, 1);

    let outcome = registry
        .cast_vote(&key, 50, &[123], ModerationAction::Kick, now)
        .await;

    assert_eq!(outcome, VoteOutcome::Rejected(RejectReason::Unauthorized));
    assert!(find(&registry, &key).await.unwrap().votes.is_empty());
}

/// Tests votes on a session that does not exist.
///
/// Expected: Rejected(UnknownSession)
#[tokio::test]
async fn rejects_unknown_session() {
    let registry = registry();

    let outcome = registry
        .cast_vote(
            &SessionKey::new(SessionKind::Return, 9),
            50,
            &[ADMIN_ROLE],
            ModerationAction::Promote,
            Utc::now(),
        )
        .await;

    assert_eq!(outcome, VoteOutcome::Rejected(RejectReason::UnknownSession));
}

/// Tests the demotion scenario: two demote votes against one keep.
///
/// Expected: resolves to demote once the second distinct admin votes, session leaves
/// the registry
#[tokio::test]
async fn resolves_at_quorum_and_leaves_registry() {
    let registry = registry();
    let now = Utc::now();
    registry
        .open(SessionKind::Demotion, 1, 2, now, Duration::hours(24))
        .await;
    let key = SessionKey::new(SessionKind::Demotion, 1);

    let first = registry
        .cast_vote(&key, 10, &[ADMIN_ROLE], ModerationAction::Demote, now)
        .await;
    assert!(matches!(first, VoteOutcome::Recorded { .. }));

    let revote = registry
        .cast_vote(&key, 10, &[ADMIN_ROLE], ModerationAction::Demote, now)
        .await;
    assert!(matches!(revote, VoteOutcome::Recorded { ref session } if session.voter_count() == 1));

    let second = registry
        .cast_vote(&key, 11, &[ADMIN_ROLE], ModerationAction::Demote, now)
        .await;
    match second {
        VoteOutcome::Resolved { decision, session } => {
            assert_eq!(decision, ModerationAction::Demote);
            assert_eq!(session.voter_count(), 2);
        }
        other => panic!("expected resolution, got {:?}", other),
    }

    assert!(!registry.has_open(&key).await);
    let late = registry
        .cast_vote(&key, 12, &[ADMIN_ROLE], ModerationAction::Keep, now)
        .await;
    assert_eq!(late, VoteOutcome::Rejected(RejectReason::UnknownSession));
}

/// Tests interleaved votes racing to complete a quorum.
///
/// Expected: exactly one vote resolves the session
#[tokio::test]
async fn concurrent_votes_resolve_once() {
    let registry = Arc::new(registry());
    let now = Utc::now();
    registry
        .open(SessionKind::Demotion, 1, 2, now, Duration::hours(24))
        .await;
    let key = SessionKey::new(SessionKind::Demotion, 1);

    let handles: Vec<_> = (0..6u64)
        .map(|admin| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .cast_vote(&key, 100 + admin, &[ADMIN_ROLE], ModerationAction::Demote, now)
                    .await
            })
        })
        .collect();

    let mut resolved = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), VoteOutcome::Resolved { .. }) {
            resolved += 1;
        }
    }
    assert_eq!(resolved, 1);
}

/// Tests expiry of overdue sessions.
///
/// Expected: overdue sessions expired and removed, others kept
#[tokio::test]
async fn expires_overdue_sessions() {
    let registry = registry();
    let now = Utc::now();
    registry
        .open(SessionKind::Ghost, 1, 1, now - Duration::hours(30), Duration::hours(24))
        .await;
    registry
        .open(SessionKind::Ghost, 2, 1, now, Duration::hours(24))
        .await;

    let expired = registry.expire_due(now).await;

    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].target_user_id, 1);
    assert_eq!(expired[0].state, crate::model::vote::SessionState::Expired);
    assert!(!registry.has_open(&SessionKey::new(SessionKind::Ghost, 1)).await);
    assert!(registry.has_open(&SessionKey::new(SessionKind::Ghost, 2)).await);
}

/// Tests prompt references and removal per user.
///
/// Expected: prompt stored; all of a user's sessions removed together
#[tokio::test]
async fn stores_prompt_and_removes_by_user() {
    let registry = registry();
    let now = Utc::now();
    registry
        .open(SessionKind::Ghost, 1, 1, now, Duration::hours(24))
        .await;
    registry
        .open(SessionKind::FinalReview, 1, 2, now, Duration::hours(24))
        .await;
    registry
        .open(SessionKind::Ghost, 2, 1, now, Duration::hours(24))
        .await;
    let key = SessionKey::new(SessionKind::Ghost, 1);
    let prompt = PromptRef {
        channel_id: 5,
        message_id: 6,
    };

    assert!(registry.set_prompt(&key, prompt).await);
    assert_eq!(find(&registry, &key).await.unwrap().prompt, Some(prompt));

    let removed = registry.remove_for_user(1).await;
    assert_eq!(removed.len(), 2);
    assert_eq!(registry.len().await, 1);
    assert!(!registry.set_prompt(&key, prompt).await);
}
