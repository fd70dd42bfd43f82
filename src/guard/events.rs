//! Event dispatch: attribute a guild event to an executor and enforce.
//!
//! Every handler is a stateless transition: resolve the executor from the
//! audit log, skip authorized actors, punish the rest. The only memory
//! between invocations is the cooldown table.

use crate::config::GuardConfig;
use crate::guard::enforce;
use crate::metrics;
use crate::platform::{AuditKind, Platform};
use crate::state::GuardState;
use serenity::model::id::{ChannelId, GuildId};
use tracing::{debug, warn};

/// A guard-relevant guild event, as delivered by the gateway.
#[derive(Debug, Clone)]
pub enum GuildEvent {
    MemberBanned { target: String },
    MemberRemoved { target: String },
    ChannelCreated { channel: ChannelId },
    ChannelDeleted { name: String },
    RoleDeleted { name: String },
    RoleUpdated { name: String },
}

impl GuildEvent {
    /// The audit-log action kind used to attribute this event.
    ///
    /// Member removal is attributed through kick entries: a voluntary
    /// leave finds no fresh kick entry and resolves the previous kicker,
    /// which the cooldown then usually suppresses. Inherent platform
    /// raciness, same as attribution in general.
    pub fn audit_kind(&self) -> AuditKind {
        match self {
            Self::MemberBanned { .. } => AuditKind::BanAdd,
            Self::MemberRemoved { .. } => AuditKind::Kick,
            Self::ChannelCreated { .. } => AuditKind::ChannelCreate,
            Self::ChannelDeleted { .. } => AuditKind::ChannelDelete,
            Self::RoleDeleted { .. } => AuditKind::RoleDelete,
            Self::RoleUpdated { .. } => AuditKind::RoleUpdate,
        }
    }

    /// Human-readable enforcement reason.
    pub fn reason(&self) -> String {
        match self {
            Self::MemberBanned { target } => {
                format!("Unauthorized ban attempt on {target}")
            }
            Self::MemberRemoved { target } => {
                format!("Unauthorized kick attempt on {target}")
            }
            Self::ChannelCreated { .. } => "Unauthorized channel creation".to_string(),
            Self::ChannelDeleted { name } => {
                format!("Unauthorized channel deletion ({name})")
            }
            Self::RoleDeleted { name } => format!("Unauthorized role deletion ({name})"),
            Self::RoleUpdated { name } => format!("Unauthorized role update ({name})"),
        }
    }
}

/// Handle one guild event end to end.
///
/// Attribution is best-effort: when the audit log yields no matching entry
/// or the query fails, the event is skipped. Authorization failures on the
/// admin lookup also skip enforcement rather than risk banning an admin on
/// a transient API error.
pub async fn handle(
    platform: &dyn Platform,
    state: &GuardState,
    cfg: &GuardConfig,
    guild: GuildId,
    event: GuildEvent,
) {
    let kind = event.audit_kind();
    metrics::inc_event(kind.as_str());

    let actor = match platform.latest_audit_actor(guild, kind).await {
        Ok(Some(actor)) => actor,
        Ok(None) => {
            debug!(guild = guild.get(), kind = kind.as_str(), "No matching audit entry");
            return;
        }
        Err(e) => {
            warn!(guild = guild.get(), kind = kind.as_str(), error = %e, "Audit log query failed");
            metrics::inc_swallowed("audit_query");
            return;
        }
    };

    if state.is_owner(actor) || state.is_trusted(actor) {
        return;
    }
    match platform.is_admin(guild, actor).await {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => {
            warn!(guild = guild.get(), actor = actor.get(), error = %e, "Admin lookup failed; skipping enforcement");
            metrics::inc_swallowed("admin_lookup");
            return;
        }
    }

    enforce::punish(platform, state, cfg, guild, actor, &event.reason()).await;

    // Revert the one event kind that leaves something behind. Runs even
    // when the punishment was cooldown-suppressed, so each rogue channel
    // is still removed.
    if let GuildEvent::ChannelCreated { channel } = event {
        if let Err(e) = platform.delete_channel(channel).await {
            warn!(guild = guild.get(), channel = channel.get(), error = %e, "Failed to delete unauthorized channel");
            metrics::inc_swallowed("delete_channel");
        }
    }
}
