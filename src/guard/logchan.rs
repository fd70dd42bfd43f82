//! Log-channel resolution.
//!
//! Resolution order: the guild's configured channel (if it still exists),
//! then a text channel with the conventional name, then creation. The pure
//! read and the side-effecting resolve-or-create are separate operations
//! so read-only callers (`showlog`) never create channels.

use crate::error::PlatformError;
use crate::metrics;
use crate::platform::Platform;
use crate::state::GuardState;
use serenity::model::id::{ChannelId, GuildId};
use tracing::warn;

/// Resolve the guild's log channel without side effects.
pub async fn resolve_existing(
    platform: &dyn Platform,
    state: &GuardState,
    guild: GuildId,
    name: &str,
) -> Result<Option<ChannelId>, PlatformError> {
    if let Some(configured) = state.log_channel(guild) {
        if platform.channel_exists(guild, configured).await? {
            return Ok(Some(configured));
        }
        // Stale config entry: the channel was deleted. Fall through to the
        // name-based lookup.
    }
    platform.find_text_channel(guild, name).await
}

/// Resolve the guild's log channel, creating the conventionally named one
/// if none exists. Failures are swallowed and counted; returns None when
/// no channel could be resolved or created.
pub async fn resolve_or_create(
    platform: &dyn Platform,
    state: &GuardState,
    guild: GuildId,
    name: &str,
) -> Option<ChannelId> {
    match resolve_existing(platform, state, guild, name).await {
        Ok(Some(channel)) => Some(channel),
        Ok(None) => match platform.create_text_channel(guild, name).await {
            Ok(channel) => Some(channel),
            Err(e) => {
                warn!(guild = guild.get(), error = %e, "Failed to create log channel");
                metrics::inc_swallowed("create_log_channel");
                None
            }
        },
        Err(e) => {
            warn!(guild = guild.get(), error = %e, "Failed to resolve log channel");
            metrics::inc_swallowed("resolve_log_channel");
            None
        }
    }
}

/// Post a message to the guild's log channel, creating it if needed.
/// Send failures are swallowed and counted.
pub async fn send_log(
    platform: &dyn Platform,
    state: &GuardState,
    guild: GuildId,
    name: &str,
    text: &str,
) {
    let Some(channel) = resolve_or_create(platform, state, guild, name).await else {
        return;
    };
    if let Err(e) = platform.send_message(channel, text).await {
        warn!(guild = guild.get(), channel = channel.get(), error = %e, "Failed to send log message");
        metrics::inc_swallowed("send_log");
    }
}
