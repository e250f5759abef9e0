//! Cleanup orchestration: sweeps, session expiry, return detection and admin lookups.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{
        bot_setting::BotSettingRepository, cleanup_action::CleanupActionRepository,
        vote_history::VoteHistoryRepository,
    },
    error::AppError,
    model::{
        action::{CleanupAction, VoteHistoryEntry},
        activity::{ActivityStatus, ReviewEntry, UserActivityRecord},
        member::{Classification, MemberSnapshot},
        vote::{SessionKey, SessionKind, VoteSession},
    },
    service::{
        executor::ActionExecutor,
        gateway::GuildGateway,
        ledger::LedgerCounts,
        scanner::{classify, InactivityScanner, SweepReport},
        tracker::Tracker,
    },
    util::retry::retry_rate_limited,
};

/// Audit entries and votes shown by the status and member reports.
const REPORT_RECENT: usize = 5;

/// Overview for the `status` command.
#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub counts: LedgerCounts,
    pub open_sessions: Vec<VoteSession>,
    pub last_sweep_at: Option<DateTime<Utc>>,
    /// Newest audit entries across all members.
    pub recent_actions: Vec<CleanupAction>,
}

/// Everything known about one member, for the `checkmember` command.
#[derive(Debug, Clone)]
pub struct MemberReport {
    pub user_id: u64,
    /// `None` when the user is not in the guild.
    pub member: Option<MemberSnapshot>,
    pub record: Option<UserActivityRecord>,
    pub days_inactive: i64,
    pub demoted: bool,
    pub review: Option<ReviewEntry>,
    pub classification: Option<Classification>,
    pub open_sessions: Vec<SessionKind>,
    pub recent_actions: Vec<CleanupAction>,
    /// Latest votes cast on this member, oldest first.
    pub recent_votes: Vec<VoteHistoryEntry>,
}

pub struct CleanupService<'a> {
    db: &'a DatabaseConnection,
    tracker: &'a Tracker,
    gateway: &'a dyn GuildGateway,
    config: &'a Config,
}

impl<'a> CleanupService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        tracker: &'a Tracker,
        gateway: &'a dyn GuildGateway,
        config: &'a Config,
    ) -> Self {
        Self {
            db,
            tracker,
            gateway,
            config,
        }
    }

    fn executor(&self) -> ActionExecutor<'_> {
        ActionExecutor::from_config(self.db, self.tracker, self.gateway, self.config)
    }

    /// Sweeps every guild member and opens sessions for flagged ones.
    ///
    /// Members flagged for final review are also put under review right away. The sweep
    /// time is recorded and the tracker flushed afterwards.
    ///
    /// # Returns
    /// - `Ok(SweepReport)` - The sweep ran; per-member failures are in `errors`
    /// - `Err(AppError)` - The member list could not be fetched
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, AppError> {
        let members = retry_rate_limited(|| self.gateway.members()).await?;

        let scanner = InactivityScanner::new(self.tracker, &self.config.roles, &self.config.tracker);
        let mut report = scanner.sweep(&members, now).await;

        for session in report
            .opened
            .iter()
            .filter(|session| session.kind == SessionKind::FinalReview)
        {
            let user_id = session.target_user_id;
            let ledger = &self.tracker.ledger;
            let days = ledger.days_inactive(user_id, now).await;
            let why = if ledger.is_demoted(user_id).await {
                format!("inactive for {} days after demotion", days)
            } else {
                format!("inactive for {} days while under review", days)
            };

            if let Err(e) = self.executor().put_under_review(user_id, &why, None).await {
                tracing::error!("Failed to put {} under review: {}", user_id, e);
                report.errors.push(format!("<@{}>: {}", user_id, e));
            }
        }

        if let Err(e) = BotSettingRepository::new(self.db)
            .set_last_sweep_at(now)
            .await
        {
            tracing::error!("Failed to record sweep time: {}", e);
        }
        if let Err(e) = self.tracker.persist().await {
            tracing::error!("Failed to persist tracker after sweep: {}", e);
        }

        tracing::info!(
            "Sweep scanned {} members, flagged {}, opened {} sessions, {} already open",
            report.scanned,
            report.flagged,
            report.opened.len(),
            report.already_open
        );

        Ok(report)
    }

    /// Expires overdue sessions and returns them so their prompts can be disabled.
    pub async fn expire_sessions(&self, now: DateTime<Utc>) -> Vec<VoteSession> {
        let expired = self.tracker.sessions.expire_due(now).await;
        if !expired.is_empty() {
            tracing::info!("Expired {} vote sessions", expired.len());
            if let Err(e) = self.tracker.persist().await {
                tracing::error!("Failed to persist tracker after expiry: {}", e);
            }
        }
        expired
    }

    /// Opens a return session when a demoted, inactive member shows activity.
    ///
    /// # Returns
    /// - `Some(VoteSession)` - A return session was opened
    /// - `None` - Not demoted, not marked inactive, or a return session is already open
    pub async fn detect_return(&self, user_id: u64, now: DateTime<Utc>) -> Option<VoteSession> {
        let ledger = &self.tracker.ledger;
        if !ledger.is_demoted(user_id).await {
            return None;
        }
        let record = ledger.get(user_id).await?;
        if record.status != ActivityStatus::Inactive {
            return None;
        }

        let kind = SessionKind::Return;
        if self
            .tracker
            .sessions
            .has_open(&SessionKey::new(kind, user_id))
            .await
        {
            return None;
        }

        let session = self
            .tracker
            .sessions
            .open(
                kind,
                user_id,
                self.config.tracker.quorum_for(kind),
                now,
                self.config.tracker.session_timeout,
            )
            .await?;

        tracing::info!("Demoted user {} is active again, opened return vote", user_id);
        if let Err(e) = self.tracker.persist().await {
            tracing::error!("Failed to persist tracker after return detection: {}", e);
        }
        Some(session)
    }

    /// Restarts a member's inactivity clock, lifts any review and closes their open
    /// sessions.
    pub async fn reset_check(&self, user_id: u64, now: DateTime<Utc>) -> Vec<VoteSession> {
        self.tracker.ledger.reset(user_id, now).await;
        self.tracker.ledger.clear_review(user_id).await;
        let closed = self.tracker.sessions.remove_for_user(user_id).await;

        tracing::info!(
            "Reset inactivity check for {} ({} sessions closed)",
            user_id,
            closed.len()
        );
        if let Err(e) = self.tracker.persist().await {
            tracing::error!("Failed to persist tracker after reset: {}", e);
        }
        closed
    }

    pub async fn status(&self) -> Result<StatusSummary, AppError> {
        let mut open_sessions = self.tracker.sessions.open_sessions().await;
        open_sessions.sort_by_key(|session| session.created_at);

        Ok(StatusSummary {
            counts: self.tracker.ledger.counts().await,
            open_sessions,
            last_sweep_at: BotSettingRepository::new(self.db)
                .get_last_sweep_at()
                .await?,
            recent_actions: CleanupActionRepository::new(self.db)
                .get_recent(REPORT_RECENT as u64)
                .await?,
        })
    }

    /// Gathers ledger, guild and audit information about one user.
    pub async fn member_report(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<MemberReport, AppError> {
        let member = self.gateway.member(user_id).await?;
        let scanner = InactivityScanner::new(self.tracker, &self.config.roles, &self.config.tracker);
        let ledger = &self.tracker.ledger;

        let classification = match &member {
            Some(member) => Some(classify(
                member,
                scanner.standing(member, now).await,
                &self.config.roles,
                &self.config.tracker,
            )),
            None => None,
        };

        let mut open_sessions: Vec<SessionKind> = self
            .tracker
            .sessions
            .open_sessions()
            .await
            .into_iter()
            .filter(|session| session.target_user_id == user_id)
            .map(|session| session.kind)
            .collect();
        open_sessions.sort_by_key(|kind| kind.as_str());

        let mut recent_actions = CleanupActionRepository::new(self.db)
            .get_by_user(user_id)
            .await?;
        recent_actions.truncate(REPORT_RECENT);

        let mut recent_votes = VoteHistoryRepository::new(self.db)
            .get_by_target(user_id)
            .await?;
        let skip = recent_votes.len().saturating_sub(REPORT_RECENT);
        recent_votes.drain(..skip);

        Ok(MemberReport {
            user_id,
            member,
            record: ledger.get(user_id).await,
            days_inactive: ledger.days_inactive(user_id, now).await,
            demoted: ledger.is_demoted(user_id).await,
            review: ledger.review_entry(user_id).await,
            classification,
            open_sessions,
            recent_actions,
            recent_votes,
        })
    }
}
