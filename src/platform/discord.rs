//! Serenity-backed implementation of the [`Platform`] capability trait.

use super::{AuditKind, Platform};
use crate::error::PlatformError;
use async_trait::async_trait;
use serenity::builder::CreateChannel;
use serenity::http::Http;
use serenity::model::channel::ChannelType;
use serenity::model::guild::audit_log::{Action, ChannelAction, MemberAction, RoleAction};
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use std::sync::Arc;

/// Discord REST API wrapper.
pub struct DiscordApi {
    http: Arc<Http>,
}

impl DiscordApi {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn audit_action(kind: AuditKind) -> Action {
    match kind {
        AuditKind::BanAdd => Action::Member(MemberAction::BanAdd),
        AuditKind::Kick => Action::Member(MemberAction::Kick),
        AuditKind::ChannelCreate => Action::Channel(ChannelAction::Create),
        AuditKind::ChannelDelete => Action::Channel(ChannelAction::Delete),
        AuditKind::RoleDelete => Action::Role(RoleAction::Delete),
        AuditKind::RoleUpdate => Action::Role(RoleAction::Update),
    }
}

#[async_trait]
impl Platform for DiscordApi {
    async fn latest_audit_actor(
        &self,
        guild: GuildId,
        kind: AuditKind,
    ) -> Result<Option<UserId>, PlatformError> {
        let logs = guild
            .audit_logs(&self.http, Some(audit_action(kind)), None, None, Some(1))
            .await?;
        Ok(logs.entries.first().map(|entry| entry.user_id))
    }

    async fn is_admin(&self, guild: GuildId, user: UserId) -> Result<bool, PlatformError> {
        let partial = guild.to_partial_guild(&self.http).await?;
        if partial.owner_id == user {
            return Ok(true);
        }
        let member = guild.member(&self.http, user).await?;

        // Effective permissions come from the member's roles plus @everyone
        // (whose role id equals the guild id).
        let everyone = RoleId::new(guild.get());
        let admin = member
            .roles
            .iter()
            .chain(std::iter::once(&everyone))
            .filter_map(|role_id| partial.roles.get(role_id))
            .any(|role| role.permissions.administrator());
        Ok(admin)
    }

    async fn ban(&self, guild: GuildId, user: UserId, reason: &str) -> Result<(), PlatformError> {
        guild.ban_with_reason(&self.http, user, 0, reason).await?;
        Ok(())
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError> {
        channel.delete(&self.http).await?;
        Ok(())
    }

    async fn channel_exists(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<bool, PlatformError> {
        let channels = guild.channels(&self.http).await?;
        Ok(channels.contains_key(&channel))
    }

    async fn find_text_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<ChannelId>, PlatformError> {
        let channels = guild.channels(&self.http).await?;
        Ok(channels
            .values()
            .find(|ch| ch.kind == ChannelType::Text && ch.name == name)
            .map(|ch| ch.id))
    }

    async fn create_text_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<ChannelId, PlatformError> {
        let builder = CreateChannel::new(name).kind(ChannelType::Text);
        let channel = guild.create_channel(&self.http, builder).await?;
        Ok(channel.id)
    }

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError> {
        channel.say(&self.http, text).await?;
        Ok(())
    }
}
