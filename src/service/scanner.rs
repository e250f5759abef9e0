//! Inactivity sweep.
//!
//! Classifies guild members from their ledger state and opens a vote session for every
//! flagged member that does not already have one of that kind.

use chrono::{DateTime, Utc};

use crate::{
    config::{GuildRoles, TrackerSettings},
    model::{
        activity::ActivityStatus,
        member::{Classification, MemberSnapshot},
        vote::{SessionKey, VoteSession},
    },
    service::tracker::Tracker,
};

/// Ledger facts about one member at sweep time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStanding {
    pub days_inactive: i64,
    pub demoted: bool,
    pub under_review: bool,
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Non-bot members examined.
    pub scanned: usize,
    /// Members classified as anything but fine.
    pub flagged: usize,
    /// Sessions opened by this sweep.
    pub opened: Vec<VoteSession>,
    /// Flagged members skipped because their session is still open.
    pub already_open: usize,
    /// Per-member failures, already logged.
    pub errors: Vec<String>,
}

/// Classifies a member.
///
/// Members never seen in the ledger are measured from when they joined, so a recruit who
/// has not spoken yet is not a ghost on day one. Bots are always fine.
///
/// A privileged member kept under review instead of demoted becomes a review candidate
/// once they reach the review threshold.
pub fn classify(
    member: &MemberSnapshot,
    standing: MemberStanding,
    roles: &GuildRoles,
    settings: &TrackerSettings,
) -> Classification {
    if member.is_bot {
        return Classification::Fine;
    }
    let days = standing.days_inactive;

    if member.role_count() <= 1 && days >= settings.inactivity_threshold_days {
        return Classification::Ghost;
    }
    if standing.demoted {
        if days >= settings.review_threshold_days && !standing.under_review {
            return Classification::ReviewCandidate;
        }
        return Classification::Fine;
    }
    if member.has_role(roles.privileged) {
        if standing.under_review {
            if days >= settings.review_threshold_days {
                return Classification::ReviewCandidate;
            }
        } else if days >= settings.inactivity_threshold_days {
            return Classification::DemotionCandidate;
        }
    }

    Classification::Fine
}

pub struct InactivityScanner<'a> {
    tracker: &'a Tracker,
    roles: &'a GuildRoles,
    settings: &'a TrackerSettings,
}

impl<'a> InactivityScanner<'a> {
    pub fn new(tracker: &'a Tracker, roles: &'a GuildRoles, settings: &'a TrackerSettings) -> Self {
        Self {
            tracker,
            roles,
            settings,
        }
    }

    /// Ledger standing of a member.
    pub async fn standing(&self, member: &MemberSnapshot, now: DateTime<Utc>) -> MemberStanding {
        let ledger = &self.tracker.ledger;
        let mut days_inactive = ledger.days_inactive(member.user_id, now).await;
        if ledger.get(member.user_id).await.is_none() {
            if let Some(joined_at) = member.joined_at {
                days_inactive = days_inactive.min((now - joined_at).num_days().max(0));
            }
        }

        MemberStanding {
            days_inactive,
            demoted: ledger.is_demoted(member.user_id).await,
            under_review: ledger.is_under_review(member.user_id).await,
        }
    }

    /// Classifies every member and opens sessions for the flagged ones.
    ///
    /// Demoted members who stay away past the inactivity threshold are marked inactive
    /// again, which re-arms return detection.
    pub async fn sweep(&self, members: &[MemberSnapshot], now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        for member in members.iter().filter(|m| !m.is_bot) {
            report.scanned += 1;
            let standing = self.standing(member, now).await;

            if standing.demoted && standing.days_inactive >= self.settings.inactivity_threshold_days
            {
                self.rearm_return_detection(member.user_id).await;
            }

            let classification = classify(member, standing, self.roles, self.settings);
            let Some(kind) = classification.session_kind() else {
                continue;
            };
            report.flagged += 1;

            let quorum = self.settings.quorum_for(kind);
            match self
                .tracker
                .sessions
                .open(kind, member.user_id, quorum, now, self.settings.session_timeout)
                .await
            {
                Some(session) => {
                    tracing::info!(
                        "Flagged {} ({}) as {:?} after {} days inactive",
                        member.display_name,
                        member.user_id,
                        classification,
                        standing.days_inactive
                    );
                    report.opened.push(session);
                }
                None => {
                    tracing::debug!(
                        "Session {} already open",
                        SessionKey::new(kind, member.user_id)
                    );
                    report.already_open += 1;
                }
            }
        }

        report
    }

    async fn rearm_return_detection(&self, user_id: u64) {
        if let Some(record) = self.tracker.ledger.get(user_id).await {
            if record.status == ActivityStatus::Active {
                self.tracker
                    .ledger
                    .set_status(user_id, ActivityStatus::Inactive)
                    .await;
            }
        }
    }
}
