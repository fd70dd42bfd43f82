//! Chat-platform capability layer.
//!
//! The guard core depends on this abstract capability set rather than the
//! serenity client directly, so the same code runs against the live
//! gateway and against in-memory test doubles.

pub mod discord;

pub use discord::DiscordApi;

use crate::error::PlatformError;
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};

/// Audit-log action kinds the guard attributes events through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditKind {
    BanAdd,
    Kick,
    ChannelCreate,
    ChannelDelete,
    RoleDelete,
    RoleUpdate,
}

impl AuditKind {
    /// Static label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BanAdd => "ban_add",
            Self::Kick => "kick",
            Self::ChannelCreate => "channel_create",
            Self::ChannelDelete => "channel_delete",
            Self::RoleDelete => "role_delete",
            Self::RoleUpdate => "role_update",
        }
    }
}

/// Everything the guard needs from the chat platform.
///
/// Attribution via `latest_audit_actor` is best-effort by platform design:
/// it returns the executor of the single most recent matching audit entry,
/// which may not be the entry for the event just observed when several
/// matching actions land close together.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Executor of the most recent audit entry of the given kind, if any.
    async fn latest_audit_actor(
        &self,
        guild: GuildId,
        kind: AuditKind,
    ) -> Result<Option<UserId>, PlatformError>;

    /// Whether the member currently holds administrator permission.
    async fn is_admin(&self, guild: GuildId, user: UserId) -> Result<bool, PlatformError>;

    /// Ban the member, deleting no message history.
    async fn ban(&self, guild: GuildId, user: UserId, reason: &str) -> Result<(), PlatformError>;

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError>;

    /// Whether the channel still exists in the guild.
    async fn channel_exists(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<bool, PlatformError>;

    /// Find a text channel by name.
    async fn find_text_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<ChannelId>, PlatformError>;

    /// Create a text channel with the given name.
    async fn create_text_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<ChannelId, PlatformError>;

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_kind_labels() {
        assert_eq!(AuditKind::BanAdd.as_str(), "ban_add");
        assert_eq!(AuditKind::RoleUpdate.as_str(), "role_update");
    }
}
