use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, temp_dir::TempDataDir};

use crate::{
    error::AppError,
    model::{
        action::ModerationAction,
        activity::{ActivityStatus, ReviewEntry, UserActivityRecord},
        snapshot::TrackerSnapshot,
        vote::{SessionKind, VoteSession},
    },
};

mod bot_setting;
mod cleanup_action;
mod json_store;
mod store;
mod user_activity;

/// A snapshot holding one record of each kind.
fn sample_snapshot() -> TrackerSnapshot {
    let now = Utc::now();
    let mut snapshot = TrackerSnapshot::default();

    let mut record = UserActivityRecord::new(10, now - Duration::days(20));
    record.activity_count = 4;
    record.message_count = 3;
    record.voice_count = 1;
    snapshot.records.insert(10, record);

    snapshot.demoted.insert(11);
    snapshot.under_review.insert(
        12,
        ReviewEntry {
            since: now,
            reason: "inactive for 31 days".to_string(),
        },
    );

    let mut session = VoteSession::open(SessionKind::Demotion, 10, 2, now, Duration::hours(24));
    session.cast(900, ModerationAction::Demote, now).unwrap();
    snapshot.sessions.insert(session.key(), session);

    snapshot
}
