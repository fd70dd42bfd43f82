//! Enforcement action: cooldown-gated auto-ban plus log message.

use crate::config::GuardConfig;
use crate::guard::logchan;
use crate::metrics;
use crate::platform::Platform;
use crate::state::GuardState;
use serenity::model::id::{GuildId, UserId};
use serenity::model::mention::Mentionable;
use tracing::{info, warn};

/// What an enforcement invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Ban attempted and log message posted.
    Punished,
    /// Actor was punished within the cooldown window; no-op.
    Suppressed,
}

/// Ban an unauthorized actor and post a log message.
///
/// Callers are responsible for authorization: the owner exemption and the
/// trusted/admin checks happen before this routine is invoked. Internally
/// this only applies the per-actor cooldown, bans (failures swallowed),
/// and logs - the log message is posted whether or not the ban succeeded.
pub async fn punish(
    platform: &dyn Platform,
    state: &GuardState,
    cfg: &GuardConfig,
    guild: GuildId,
    actor: UserId,
    reason: &str,
) -> Outcome {
    let now = chrono::Utc::now().timestamp();
    if !state.begin_cooldown(actor, now, cfg.cooldown_secs) {
        metrics::inc_enforcement("suppressed");
        return Outcome::Suppressed;
    }

    info!(guild = guild.get(), actor = actor.get(), reason, "Auto-banning actor");
    if let Err(e) = platform.ban(guild, actor, reason).await {
        // Insufficient permission or the actor is already gone.
        warn!(guild = guild.get(), actor = actor.get(), error = %e, "Ban failed");
        metrics::inc_swallowed("ban");
    }

    let text = format!(
        "🚨 **Auto-ban** → {} (`{}`) — {}",
        actor.mention(),
        actor,
        reason
    );
    logchan::send_log(platform, state, guild, &cfg.log_channel_name, &text).await;

    metrics::inc_enforcement("banned");
    Outcome::Punished
}
