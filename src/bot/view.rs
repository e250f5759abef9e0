//! Message formatting for vote prompts and command replies.
//!
//! Everything here is pure: builders and strings are produced from domain values and
//! sent by the callers.

use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
};

use crate::{
    model::{
        action::ModerationAction,
        activity::NEVER_SEEN_DAYS,
        interview::InterviewTranscript,
        member::Classification,
        vote::{SessionKey, SessionKind, VoteSession},
    },
    service::{
        cleanup::{MemberReport, StatusSummary},
        scanner::SweepReport,
    },
};

const VOTE_PREFIX: &str = "vote";

/// Discord's message length limit, in characters.
const MESSAGE_LIMIT: usize = 2000;

const OPEN_COLOR: u32 = 0xf39c12;
const CLOSED_COLOR: u32 = 0x95a5a6;

/// Builds the custom id of a vote button: `vote:<kind>:<target_user_id>:<option>`.
pub fn vote_custom_id(key: &SessionKey, option: ModerationAction) -> String {
    format!("{}:{}:{}:{}", VOTE_PREFIX, key.kind, key.user_id, option)
}

/// Parses a vote button custom id.
///
/// # Returns
/// - `Some((SessionKey, ModerationAction))` - Session and chosen option
/// - `None` - Not a vote button, or a malformed id
pub fn parse_vote_custom_id(custom_id: &str) -> Option<(SessionKey, ModerationAction)> {
    let mut parts = custom_id.split(':');
    if parts.next()? != VOTE_PREFIX {
        return None;
    }

    let kind = SessionKind::parse(parts.next()?)?;
    let user_id = parts.next()?.parse::<u64>().ok().filter(|id| *id != 0)?;
    let option = ModerationAction::parse(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    Some((SessionKey::new(kind, user_id), option))
}

fn session_title(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Ghost => "👻 Ghost member",
        SessionKind::Demotion => "📉 Demotion vote",
        SessionKind::Return => "📈 Member returned",
        SessionKind::FinalReview => "⚖️ Final review",
    }
}

fn session_description(session: &VoteSession, days_inactive: i64) -> String {
    let user = format!("<@{}>", session.target_user_id);
    let inactive = describe_inactivity(days_inactive);

    match session.kind {
        SessionKind::Ghost => format!("{} has no roles and has been {}.", user, inactive),
        SessionKind::Demotion => format!(
            "{} holds the privileged role but has been {}.",
            user, inactive
        ),
        SessionKind::Return => format!("{} was demoted and is active again.", user),
        SessionKind::FinalReview => format!(
            "{} was demoted and has now been {}.",
            user, inactive
        ),
    }
}

fn describe_inactivity(days: i64) -> String {
    if days >= NEVER_SEEN_DAYS {
        "never seen active".to_string()
    } else {
        format!("inactive for {} days", days)
    }
}

fn option_label(option: ModerationAction) -> &'static str {
    match option {
        ModerationAction::Kick => "Kick",
        ModerationAction::Demote => "Demote",
        ModerationAction::Promote => "Promote",
        ModerationAction::Keep => "Keep",
        ModerationAction::Review => "Review",
    }
}

fn option_style(option: ModerationAction) -> ButtonStyle {
    match option {
        ModerationAction::Kick | ModerationAction::Demote => ButtonStyle::Danger,
        ModerationAction::Promote => ButtonStyle::Success,
        ModerationAction::Keep => ButtonStyle::Secondary,
        ModerationAction::Review => ButtonStyle::Primary,
    }
}

fn tally_text(session: &VoteSession) -> String {
    session
        .tally()
        .into_iter()
        .map(|(option, count)| format!("{}: {}", option_label(option), count))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Embed for an open vote session.
pub fn session_embed(session: &VoteSession, days_inactive: i64) -> CreateEmbed {
    CreateEmbed::new()
        .title(session_title(session.kind))
        .description(session_description(session, days_inactive))
        .color(OPEN_COLOR)
        .field(
            "Votes",
            format!(
                "{}/{} admins voted\n{}",
                session.voter_count(),
                session.quorum,
                tally_text(session)
            ),
            false,
        )
        .field(
            "Expires",
            format!("<t:{}:R>", session.expires_at.timestamp()),
            true,
        )
        .footer(CreateEmbedFooter::new(session.key().to_string()))
}

/// Embed replacing a prompt once its session is closed.
pub fn closed_embed(session: &VoteSession, note: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("{} (closed)", session_title(session.kind)))
        .description(format!("<@{}>\n{}", session.target_user_id, note))
        .color(CLOSED_COLOR)
        .field("Final votes", tally_text(session), false)
        .footer(CreateEmbedFooter::new(session.key().to_string()))
}

/// One button per option of the session kind.
pub fn session_components(session: &VoteSession, disabled: bool) -> Vec<CreateActionRow> {
    let key = session.key();
    let buttons = session
        .kind
        .options()
        .iter()
        .map(|option| {
            CreateButton::new(vote_custom_id(&key, *option))
                .label(option_label(*option))
                .style(option_style(*option))
                .disabled(disabled)
        })
        .collect();

    vec![CreateActionRow::Buttons(buttons)]
}

pub fn status_text(summary: &StatusSummary, active_interviews: usize) -> String {
    let last_sweep = match summary.last_sweep_at {
        Some(at) => format!("<t:{}:R>", at.timestamp()),
        None => "never".to_string(),
    };

    let mut text = format!(
        "**Warden status**\nTracked members: {}\nDemoted: {}\nUnder review: {}\nActive interviews: {}\nLast sweep: {}\nOpen votes: {}",
        summary.counts.tracked,
        summary.counts.demoted,
        summary.counts.under_review,
        active_interviews,
        last_sweep,
        summary.open_sessions.len()
    );

    for session in &summary.open_sessions {
        text.push_str(&format!(
            "\n• {} <@{}> ({}/{}, expires <t:{}:R>)",
            session.kind,
            session.target_user_id,
            session.voter_count(),
            session.quorum,
            session.expires_at.timestamp()
        ));
    }

    if !summary.recent_actions.is_empty() {
        text.push_str("\nRecent actions:");
        for action in &summary.recent_actions {
            text.push_str(&format!(
                "\n• <t:{}:R> <@{}> {}",
                action.created_at.timestamp(),
                action.user_id,
                action.action.past_tense()
            ));
        }
    }

    text
}

fn classification_label(classification: Classification) -> &'static str {
    match classification {
        Classification::Ghost => "ghost",
        Classification::DemotionCandidate => "demotion candidate",
        Classification::ReviewCandidate => "review candidate",
        Classification::Fine => "fine",
    }
}

pub fn member_report_text(report: &MemberReport) -> String {
    let mut lines = vec![format!("**Member report for <@{}>**", report.user_id)];

    match &report.member {
        Some(member) => lines.push(format!(
            "In guild as {} with {} roles",
            member.display_name,
            member.role_ids.len()
        )),
        None => lines.push("Not in the guild".to_string()),
    }

    match &report.record {
        Some(record) => {
            lines.push(format!(
                "Last active: <t:{}:R> ({})",
                record.last_active.timestamp(),
                describe_inactivity(report.days_inactive)
            ));
            lines.push(format!(
                "Activity: {} events ({} messages, {} voice)",
                record.activity_count, record.message_count, record.voice_count
            ));
            lines.push(format!("Status: {}", record.status.as_str()));
        }
        None => lines.push("No recorded activity".to_string()),
    }

    if report.demoted {
        lines.push("Demoted: yes".to_string());
    }
    if let Some(review) = &report.review {
        lines.push(format!(
            "Under review since <t:{}:d>: {}",
            review.since.timestamp(),
            review.reason
        ));
    }
    if let Some(classification) = report.classification {
        lines.push(format!(
            "Classification: {}",
            classification_label(classification)
        ));
    }
    if !report.open_sessions.is_empty() {
        let kinds: Vec<&str> = report.open_sessions.iter().map(|kind| kind.as_str()).collect();
        lines.push(format!("Open votes: {}", kinds.join(", ")));
    }
    for vote in &report.recent_votes {
        lines.push(format!(
            "• <t:{}:d> <@{}> voted {} ({})",
            vote.cast_at.timestamp(),
            vote.admin_id,
            vote.option,
            vote.session_key
        ));
    }
    for action in &report.recent_actions {
        lines.push(format!(
            "• <t:{}:d> {}: {}",
            action.created_at.timestamp(),
            action.action,
            action.reason
        ));
    }

    lines.join("\n")
}

pub fn help_text(prefix: &str) -> String {
    [
        "**Warden commands**".to_string(),
        format!("`{}status` - tracker overview and open votes", prefix),
        format!("`{}cleanup` - run an inactivity sweep now (admin)", prefix),
        format!("`{}resetcheck <user>` - restart a member's inactivity clock (admin)", prefix),
        format!("`{}interview <user>` - DM a member the recruit questions (admin)", prefix),
        format!("`{}checkmember <user>` - everything known about a member", prefix),
        format!("`{}help` - this message", prefix),
        format!("`{}test` - check the bot is responding", prefix),
    ]
    .join("\n")
}

pub fn sweep_summary_text(report: &SweepReport) -> String {
    let mut text = format!(
        "🧹 Sweep finished: {} members scanned, {} flagged, {} new votes, {} already open.",
        report.scanned,
        report.flagged,
        report.opened.len(),
        report.already_open
    );

    if !report.errors.is_empty() {
        text.push_str(&format!("\n⚠️ {} errors:", report.errors.len()));
        for error in &report.errors {
            text.push_str(&format!("\n• {}", error));
        }
    }

    text
}

pub fn sweep_alert_text(failures: u32, error: &str) -> String {
    format!(
        "🚨 Inactivity sweep failed {} times in a row. Last error: {}",
        failures, error
    )
}

pub fn interview_intro_text(questions: usize) -> String {
    format!(
        "👋 Welcome! Please answer {} short questions so the admins can get to know you. Reply to each one here.",
        questions
    )
}

pub fn interview_summary_text(transcript: &InterviewTranscript) -> String {
    let mut text = format!("📋 **Interview with <@{}>**", transcript.user_id);
    if let Some(admin) = transcript.requested_by {
        text.push_str(&format!(" (requested by <@{}>)", admin));
    }

    for (question, answer) in &transcript.entries {
        text.push_str(&format!("\n**{}**\n{}", question, answer));
    }

    text
}

/// Cuts text down to Discord's message limit.
pub fn fit_message(text: String) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text;
    }

    let mut fitted: String = text.chars().take(MESSAGE_LIMIT - 1).collect();
    fitted.push('…');
    fitted
}

pub fn online_text(user_id: u64) -> String {
    format!("👋 <@{}> is now online!", user_id)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::model::vote::Ballot;

    fn demotion_session() -> VoteSession {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        VoteSession::open(SessionKind::Demotion, 42, 2, now, Duration::hours(24))
    }

    #[test]
    fn custom_id_round_trips() {
        let key = SessionKey::new(SessionKind::FinalReview, 42);
        let id = vote_custom_id(&key, ModerationAction::Kick);

        assert_eq!(id, "vote:final_review:42:kick");
        assert_eq!(
            parse_vote_custom_id(&id),
            Some((key, ModerationAction::Kick))
        );
    }

    #[test]
    fn rejects_malformed_custom_ids() {
        assert_eq!(parse_vote_custom_id("poll:ghost:42:kick"), None);
        assert_eq!(parse_vote_custom_id("vote:ghost:42"), None);
        assert_eq!(parse_vote_custom_id("vote:ghost:abc:kick"), None);
        assert_eq!(parse_vote_custom_id("vote:ghost:0:kick"), None);
        assert_eq!(parse_vote_custom_id("vote:unknown:42:kick"), None);
        assert_eq!(parse_vote_custom_id("vote:ghost:42:ban"), None);
        assert_eq!(parse_vote_custom_id("vote:ghost:42:kick:extra"), None);
    }

    #[test]
    fn components_offer_every_option_of_the_kind() {
        let session = demotion_session();
        let json = serde_json::to_string(&session_components(&session, false)).unwrap();

        assert!(json.contains("vote:demotion:42:demote"));
        assert!(json.contains("vote:demotion:42:keep"));
        assert!(json.contains("vote:demotion:42:review"));
        assert!(!json.contains("vote:demotion:42:kick"));
    }

    #[test]
    fn embed_shows_progress_towards_quorum() {
        let mut session = demotion_session();
        session.votes.push(Ballot {
            admin_id: 7,
            option: ModerationAction::Demote,
        });

        let json = serde_json::to_string(&session_embed(&session, 16)).unwrap();

        assert!(json.contains("1/2 admins voted"));
        assert!(json.contains("inactive for 16 days"));
        assert!(json.contains("Demote: 1"));
    }

    #[test]
    fn never_seen_members_are_described_as_such() {
        let session = demotion_session();
        let json = serde_json::to_string(&session_embed(&session, NEVER_SEEN_DAYS)).unwrap();

        assert!(json.contains("never seen active"));
    }

    #[test]
    fn long_replies_are_cut_to_the_limit() {
        let short = "ok".to_string();
        assert_eq!(fit_message(short.clone()), short);

        let long = "é".repeat(MESSAGE_LIMIT + 10);
        let fitted = fit_message(long);
        assert_eq!(fitted.chars().count(), MESSAGE_LIMIT);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn help_uses_configured_prefix() {
        let text = help_text("?");

        assert!(text.contains("`?status`"));
        assert!(text.contains("`?checkmember <user>`"));
    }

    #[test]
    fn interview_summary_lists_answers_in_order() {
        let now = Utc::now();
        let transcript = InterviewTranscript {
            user_id: 42,
            requested_by: Some(7),
            entries: vec![
                ("How did you find us?".to_string(), "A friend".to_string()),
                ("What do you play?".to_string(), "Everything".to_string()),
            ],
            started_at: now,
            finished_at: now,
        };

        let text = interview_summary_text(&transcript);

        assert!(text.contains("requested by <@7>"));
        let first = text.find("A friend").unwrap();
        let second = text.find("Everything").unwrap();
        assert!(first < second);
    }

    #[test]
    fn sweep_summary_lists_errors() {
        let report = SweepReport {
            scanned: 10,
            flagged: 2,
            opened: Vec::new(),
            already_open: 2,
            errors: vec!["<@5>: boom".to_string()],
        };

        let text = sweep_summary_text(&report);

        assert!(text.contains("10 members scanned"));
        assert!(text.contains("1 errors"));
        assert!(text.contains("<@5>: boom"));
    }
}
