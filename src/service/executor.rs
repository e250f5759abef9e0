//! Applies moderation decisions.
//!
//! Every operation follows the same steps: check the bot may perform the mutation, perform
//! it through the gateway, update the ledger, append an audit entry and post a notification
//! to the log channel. Role mutations are skipped when the member already has the target
//! state, so repeating an action is harmless. Once the mutation succeeded, failures in the
//! bookkeeping steps are logged rather than returned.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    config::{Config, GuildRoles},
    data::cleanup_action::CleanupActionRepository,
    error::AppError,
    model::{
        action::{ActionReport, CreateCleanupActionParam, ModerationAction},
        activity::{ActivityStatus, ReviewEntry},
        member::MemberSnapshot,
        vote::VoteSession,
    },
    service::{
        gateway::{Capability, GuildGateway},
        tracker::Tracker,
    },
    util::retry::retry_rate_limited,
};

pub struct ActionExecutor<'a> {
    db: &'a DatabaseConnection,
    tracker: &'a Tracker,
    gateway: &'a dyn GuildGateway,
    roles: &'a GuildRoles,
    log_channel_id: u64,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        tracker: &'a Tracker,
        gateway: &'a dyn GuildGateway,
        roles: &'a GuildRoles,
        log_channel_id: u64,
    ) -> Self {
        Self {
            db,
            tracker,
            gateway,
            roles,
            log_channel_id,
        }
    }

    pub fn from_config(
        db: &'a DatabaseConnection,
        tracker: &'a Tracker,
        gateway: &'a dyn GuildGateway,
        config: &'a Config,
    ) -> Self {
        Self::new(db, tracker, gateway, &config.roles, config.channels.log)
    }

    /// Applies a resolved vote decision.
    ///
    /// # Arguments
    /// - `action` - The decision
    /// - `user_id` - Member the decision applies to
    /// - `admin_id` - Admin whose vote completed the quorum, `None` for automatic actions
    pub async fn apply(
        &self,
        action: ModerationAction,
        user_id: u64,
        admin_id: Option<u64>,
    ) -> Result<ActionReport, AppError> {
        match action {
            ModerationAction::Kick => self.kick(user_id, admin_id).await,
            ModerationAction::Demote => self.demote(user_id, admin_id).await,
            ModerationAction::Promote => self.promote(user_id, admin_id).await,
            ModerationAction::Keep => self.keep(user_id, admin_id).await,
            ModerationAction::Review => {
                self.put_under_review(user_id, "admins voted to review", admin_id)
                    .await
            }
        }
    }

    /// Kicks a member and purges everything tracked about them.
    ///
    /// A member who already left is not an error: local state is purged all the same.
    ///
    /// # Returns
    /// - `Ok(ActionReport)` - Member gone; every session on them closed
    /// - `Err(AppError::PermissionDenied)` - Bot lacks Kick Members or is outranked
    /// - `Err(AppError)` - Discord request failed
    pub async fn kick(&self, user_id: u64, admin_id: Option<u64>) -> Result<ActionReport, AppError> {
        let reason = audit_reason(ModerationAction::Kick, admin_id);

        let present = match self.gateway.member(user_id).await? {
            Some(_) => {
                let capability = self.gateway.capability(user_id, &[]).await?;
                if !capability.can_kick() {
                    return Err(denied(ModerationAction::Kick, user_id, capability));
                }
                match retry_rate_limited(|| self.gateway.kick(user_id, &reason)).await {
                    Ok(()) => true,
                    Err(AppError::NotFound(_)) => false,
                    Err(e) => return Err(e),
                }
            }
            None => false,
        };

        if !present {
            tracing::info!("User {} already left the guild, purging local state", user_id);
        }

        self.tracker.ledger.forget(user_id).await;
        let closed = self.tracker.sessions.remove_for_user(user_id).await;

        let message = if present {
            format!("👢 <@{}> was kicked{}.", user_id, by(admin_id))
        } else {
            format!(
                "👢 <@{}> had already left; their tracking data was removed{}.",
                user_id,
                by(admin_id)
            )
        };

        Ok(self
            .finish(ModerationAction::Kick, user_id, admin_id, reason, message, closed)
            .await)
    }

    /// Removes the privileged role, adds the inactive role and marks the user demoted.
    pub async fn demote(
        &self,
        user_id: u64,
        admin_id: Option<u64>,
    ) -> Result<ActionReport, AppError> {
        let reason = audit_reason(ModerationAction::Demote, admin_id);
        let member = self.require_member(user_id).await?;
        self.require_role_capability(ModerationAction::Demote, user_id)
            .await?;

        if member.has_role(self.roles.privileged) {
            retry_rate_limited(|| {
                self.gateway
                    .remove_role(user_id, self.roles.privileged, &reason)
            })
            .await?;
        }
        if !member.has_role(self.roles.inactive) {
            retry_rate_limited(|| self.gateway.add_role(user_id, self.roles.inactive, &reason))
                .await?;
        }

        let ledger = &self.tracker.ledger;
        ledger.mark_demoted(user_id).await;
        ledger.set_status(user_id, ActivityStatus::Inactive).await;
        ledger
            .set_current_role(user_id, Some(self.roles.inactive))
            .await;

        let message = format!("⬇️ <@{}> was demoted{}.", user_id, by(admin_id));
        Ok(self
            .finish(ModerationAction::Demote, user_id, admin_id, reason, message, Vec::new())
            .await)
    }

    /// Restores the privileged role, removes the inactive role and clears demotion and
    /// review. The member counts as active from now on.
    pub async fn promote(
        &self,
        user_id: u64,
        admin_id: Option<u64>,
    ) -> Result<ActionReport, AppError> {
        let reason = audit_reason(ModerationAction::Promote, admin_id);
        let member = self.require_member(user_id).await?;
        self.require_role_capability(ModerationAction::Promote, user_id)
            .await?;

        if !member.has_role(self.roles.privileged) {
            retry_rate_limited(|| {
                self.gateway
                    .add_role(user_id, self.roles.privileged, &reason)
            })
            .await?;
        }
        if member.has_role(self.roles.inactive) {
            retry_rate_limited(|| {
                self.gateway
                    .remove_role(user_id, self.roles.inactive, &reason)
            })
            .await?;
        }

        let ledger = &self.tracker.ledger;
        ledger.clear_demoted(user_id).await;
        ledger.clear_review(user_id).await;
        ledger.reset(user_id, Utc::now()).await;
        ledger
            .set_current_role(user_id, Some(self.roles.privileged))
            .await;

        let message = format!("⬆️ <@{}> was promoted back{}.", user_id, by(admin_id));
        Ok(self
            .finish(ModerationAction::Promote, user_id, admin_id, reason, message, Vec::new())
            .await)
    }

    /// Leaves roles untouched, restarts the inactivity clock and lifts any review.
    pub async fn keep(&self, user_id: u64, admin_id: Option<u64>) -> Result<ActionReport, AppError> {
        let reason = audit_reason(ModerationAction::Keep, admin_id);

        let ledger = &self.tracker.ledger;
        ledger.reset(user_id, Utc::now()).await;
        ledger.clear_review(user_id).await;

        let message = format!("✅ <@{}> will be kept{}.", user_id, by(admin_id));
        Ok(self
            .finish(ModerationAction::Keep, user_id, admin_id, reason, message, Vec::new())
            .await)
    }

    /// Puts a member under review. Roles are untouched; an existing review is kept as is.
    pub async fn put_under_review(
        &self,
        user_id: u64,
        why: &str,
        admin_id: Option<u64>,
    ) -> Result<ActionReport, AppError> {
        let reason = format!("{} ({})", audit_reason(ModerationAction::Review, admin_id), why);

        let ledger = &self.tracker.ledger;
        ledger
            .mark_under_review(
                user_id,
                ReviewEntry {
                    since: Utc::now(),
                    reason: why.to_string(),
                },
            )
            .await;
        ledger.set_status(user_id, ActivityStatus::UnderReview).await;

        let message = format!(
            "🔍 <@{}> is now under review: {}{}.",
            user_id,
            why,
            by(admin_id)
        );
        Ok(self
            .finish(ModerationAction::Review, user_id, admin_id, reason, message, Vec::new())
            .await)
    }

    async fn require_member(&self, user_id: u64) -> Result<MemberSnapshot, AppError> {
        self.gateway
            .member(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("<@{}> is not a member of the guild", user_id)))
    }

    async fn require_role_capability(
        &self,
        action: ModerationAction,
        user_id: u64,
    ) -> Result<(), AppError> {
        let capability = self
            .gateway
            .capability(user_id, &[self.roles.privileged, self.roles.inactive])
            .await?;
        if capability.can_change_roles() {
            Ok(())
        } else {
            Err(denied(action, user_id, capability))
        }
    }

    /// Persists, audits and notifies. Failures here are logged only.
    async fn finish(
        &self,
        action: ModerationAction,
        user_id: u64,
        admin_id: Option<u64>,
        reason: String,
        message: String,
        closed_sessions: Vec<VoteSession>,
    ) -> ActionReport {
        tracing::info!("Applied {} to user {} ({})", action, user_id, reason);

        if let Err(e) = self.tracker.persist().await {
            tracing::error!("Failed to persist tracker after {}: {}", action, e);
        }

        if let Err(e) = CleanupActionRepository::new(self.db)
            .create(CreateCleanupActionParam {
                user_id,
                action,
                admin_id,
                reason,
            })
            .await
        {
            tracing::error!("Failed to write audit entry for {} of {}: {}", action, user_id, e);
        }

        if let Err(e) =
            retry_rate_limited(|| self.gateway.post_message(self.log_channel_id, &message)).await
        {
            tracing::error!("Failed to post {} notification: {}", action, e);
        }

        ActionReport {
            action,
            user_id,
            admin_id,
            message,
            closed_sessions,
        }
    }
}

fn audit_reason(action: ModerationAction, admin_id: Option<u64>) -> String {
    match admin_id {
        Some(admin) => format!("Inactivity cleanup: {} voted by {}", action, admin),
        None => format!("Inactivity cleanup: automatic {}", action),
    }
}

fn by(admin_id: Option<u64>) -> String {
    match admin_id {
        Some(admin) => format!(" (final vote by <@{}>)", admin),
        None => String::new(),
    }
}

fn denied(action: ModerationAction, user_id: u64, capability: Capability) -> AppError {
    let missing = match action {
        ModerationAction::Kick if !capability.kick_members => "the Kick Members permission",
        _ if !capability.outranks_target => "a role above the member's highest role",
        _ if !capability.manage_roles => "the Manage Roles permission",
        _ => "a role above the managed roles",
    };
    AppError::PermissionDenied(format!("cannot {} <@{}> without {}", action, user_id, missing))
}
