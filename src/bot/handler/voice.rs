use chrono::Utc;
use serenity::all::{Context, VoiceState};

use crate::{model::activity::ActivityKind, state::AppContext};

/// Counts joining or switching a voice channel as activity.
///
/// Leaving and mute/deafen updates are ignored.
pub async fn handle_voice_state_update(
    app: &AppContext,
    _ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    if new.guild_id.map(|id| id.get()) != Some(app.config.guild_id) {
        return;
    }
    if new.member.as_ref().is_some_and(|member| member.user.bot) {
        return;
    }

    let Some(channel_id) = new.channel_id else {
        return;
    };
    if old.and_then(|state| state.channel_id) == Some(channel_id) {
        return;
    }

    let user_id = new.user_id.get();
    app.tracker
        .record_activity(user_id, ActivityKind::Voice, Utc::now())
        .await;

    tracing::debug!("Recorded voice activity for {} in {}", user_id, channel_id);
}
