//! Prefix commands.
//!
//! Parsing is separate from execution so the grammar can be tested without Discord.

use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;

use crate::{
    bot::{
        gateway::SerenityGateway,
        prompt::{close_vote_prompts, sweep_and_prompt},
        view,
    },
    error::AppError,
    service::{cleanup::CleanupService, gateway::GuildGateway},
    state::AppContext,
    util::{parse::parse_user_mention, retry::retry_rate_limited},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Cleanup,
    ResetCheck(u64),
    Interview(u64),
    CheckMember(u64),
    Help,
    Test,
}

impl Command {
    /// Parses a message into a command.
    ///
    /// # Returns
    /// - `None` - Not addressed to the bot, or an unknown command name
    /// - `Some(Ok(Command))` - A valid command
    /// - `Some(Err(AppError::BadRequest))` - A known command with a missing or invalid user
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, AppError>> {
        let rest = content.trim().strip_prefix(prefix)?;
        let mut args = rest.split_whitespace();
        let name = args.next()?.to_lowercase();

        let command = match name.as_str() {
            "status" => Self::Status,
            "cleanup" => Self::Cleanup,
            "help" => Self::Help,
            "test" => Self::Test,
            "resetcheck" | "interview" | "checkmember" => {
                let Some(user_id) = args.next().and_then(parse_user_mention) else {
                    return Some(Err(AppError::BadRequest(format!(
                        "Usage: {}{} <user>",
                        prefix, name
                    ))));
                };
                match name.as_str() {
                    "resetcheck" => Self::ResetCheck(user_id),
                    "interview" => Self::Interview(user_id),
                    _ => Self::CheckMember(user_id),
                }
            }
            _ => return None,
        };

        Some(Ok(command))
    }

    /// Whether only holders of an admin role may run the command.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Cleanup | Self::ResetCheck(_) | Self::Interview(_)
        )
    }
}

/// Runs a parsed command and returns the reply text.
///
/// # Arguments
/// - `http` - Discord HTTP client
/// - `app` - Shared application context
/// - `author_id` - User who sent the command
/// - `command` - The command to run
pub async fn execute(
    http: &Arc<Http>,
    app: &AppContext,
    author_id: u64,
    command: Command,
) -> Result<String, AppError> {
    let gateway = SerenityGateway::new(http.clone(), app.config.guild_id);
    let cleanup = CleanupService::new(&app.db, &app.tracker, &gateway, &app.config);
    let now = Utc::now();

    match command {
        Command::Status => {
            let summary = cleanup.status().await?;
            Ok(view::status_text(
                &summary,
                app.interviews.active_count().await,
            ))
        }
        Command::Cleanup => {
            let report = sweep_and_prompt(http, app).await?;
            Ok(view::sweep_summary_text(&report))
        }
        Command::ResetCheck(user_id) => {
            let closed = cleanup.reset_check(user_id, now).await;
            let note = format!("Inactivity check reset by <@{}>.", author_id);
            close_vote_prompts(http, &closed, &note).await;

            Ok(format!(
                "✅ Reset inactivity check for <@{}> ({} open votes closed).",
                user_id,
                closed.len()
            ))
        }
        Command::Interview(user_id) => start_interview(&gateway, app, user_id, Some(author_id))
            .await
            .map(|()| format!("📨 Interview sent to <@{}>.", user_id)),
        Command::CheckMember(user_id) => {
            let report = cleanup.member_report(user_id, now).await?;
            Ok(view::member_report_text(&report))
        }
        Command::Help => Ok(view::help_text(&app.config.command_prefix)),
        Command::Test => Ok(format!(
            "✅ Warden is running. Tracking {} members with {} open votes.",
            app.tracker.ledger.counts().await.tracked,
            app.tracker.sessions.len().await
        )),
    }
}

/// Starts an interview and DMs the first question.
///
/// The interview is cancelled again if the DM cannot be delivered.
pub async fn start_interview(
    gateway: &dyn GuildGateway,
    app: &AppContext,
    user_id: u64,
    requested_by: Option<u64>,
) -> Result<(), AppError> {
    if gateway.member(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("<@{}> is not in the server", user_id)));
    }

    let Some(first) = app.interviews.start(user_id, requested_by, Utc::now()).await else {
        return Err(AppError::BadRequest(format!(
            "<@{}> already has an interview in progress.",
            user_id
        )));
    };

    let intro = format!(
        "{}\n\n{}",
        view::interview_intro_text(app.config.interview_questions.len()),
        first
    );
    if let Err(e) = retry_rate_limited(|| gateway.send_dm(user_id, &intro)).await {
        app.interviews.cancel(user_id).await;
        return Err(e);
    }

    tracing::info!("Started interview with {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Option<Result<Command, AppError>> {
        Command::parse("!", content)
    }

    #[test]
    fn parses_simple_commands() {
        assert!(matches!(parse("!status"), Some(Ok(Command::Status))));
        assert!(matches!(parse("!cleanup"), Some(Ok(Command::Cleanup))));
        assert!(matches!(parse("  !HELP  "), Some(Ok(Command::Help))));
        assert!(matches!(parse("!test"), Some(Ok(Command::Test))));
    }

    #[test]
    fn parses_user_arguments() {
        assert!(matches!(
            parse("!resetcheck <@42>"),
            Some(Ok(Command::ResetCheck(42)))
        ));
        assert!(matches!(
            parse("!interview <@!42>"),
            Some(Ok(Command::Interview(42)))
        ));
        assert!(matches!(
            parse("!checkmember 42"),
            Some(Ok(Command::CheckMember(42)))
        ));
    }

    #[test]
    fn missing_user_is_a_usage_error() {
        let Some(Err(AppError::BadRequest(message))) = parse("!checkmember") else {
            panic!("expected usage error");
        };
        assert_eq!(message, "Usage: !checkmember <user>");

        assert!(matches!(
            parse("!resetcheck <@&42>"),
            Some(Err(AppError::BadRequest(_)))
        ));
    }

    #[test]
    fn ignores_other_messages() {
        assert!(parse("hello there").is_none());
        assert!(parse("!").is_none());
        assert!(parse("!dance").is_none());
        assert!(Command::parse("?", "!status").is_none());
    }

    #[test]
    fn admin_only_commands() {
        assert!(Command::Cleanup.requires_admin());
        assert!(Command::ResetCheck(1).requires_admin());
        assert!(Command::Interview(1).requires_admin());
        assert!(!Command::Status.requires_admin());
        assert!(!Command::CheckMember(1).requires_admin());
        assert!(!Command::Help.requires_admin());
    }
}
