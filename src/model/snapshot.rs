use std::collections::{HashMap, HashSet};

use crate::model::{
    activity::{ReviewEntry, UserActivityRecord},
    vote::{SessionKey, VoteSession},
};

/// Everything the tracker persists, detached from its locks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerSnapshot {
    pub records: HashMap<u64, UserActivityRecord>,
    pub demoted: HashSet<u64>,
    pub under_review: HashMap<u64, ReviewEntry>,
    /// Open sessions only; resolved and expired ones are not kept.
    pub sessions: HashMap<SessionKey, VoteSession>,
}
