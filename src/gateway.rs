//! Serenity gateway glue.
//!
//! Translates raw gateway events into [`GuildEvent`]s and feeds them to
//! the guard core, and routes guild messages through the command surface.

use crate::commands;
use crate::config::Config;
use crate::guard::events::{self, GuildEvent};
use crate::platform::DiscordApi;
use crate::state::GuardState;
use serenity::async_trait;
use serenity::model::channel::{GuildChannel, Message};
use serenity::model::gateway::Ready;
use serenity::model::guild::{Member, Role};
use serenity::model::id::{GuildId, RoleId};
use serenity::model::user::User;
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents};
use std::sync::Arc;
use tracing::info;

/// Gateway event handler holding the shared guard context.
pub struct Handler {
    config: Arc<Config>,
    state: Arc<GuardState>,
}

impl Handler {
    pub fn new(config: Arc<Config>, state: Arc<GuardState>) -> Self {
        Self { config, state }
    }

    fn api(&self, ctx: &Context) -> DiscordApi {
        DiscordApi::new(Arc::clone(&ctx.http))
    }

    async fn guard(&self, ctx: &Context, guild: GuildId, event: GuildEvent) {
        let api = self.api(ctx);
        events::handle(&api, &self.state, &self.config.guard, guild, event).await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Logged in");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild) = msg.guild_id else {
            return;
        };
        let api = self.api(&ctx);
        commands::dispatch(
            &api,
            &self.state,
            &self.config,
            guild,
            msg.channel_id,
            msg.author.id,
            &msg.content,
        )
        .await;
    }

    async fn guild_ban_addition(&self, ctx: Context, guild_id: GuildId, banned_user: User) {
        self.guard(
            &ctx,
            guild_id,
            GuildEvent::MemberBanned {
                target: banned_user.tag(),
            },
        )
        .await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.guard(
            &ctx,
            guild_id,
            GuildEvent::MemberRemoved { target: user.tag() },
        )
        .await;
    }

    async fn channel_create(&self, ctx: Context, channel: GuildChannel) {
        self.guard(
            &ctx,
            channel.guild_id,
            GuildEvent::ChannelCreated { channel: channel.id },
        )
        .await;
    }

    async fn channel_delete(
        &self,
        ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        self.guard(
            &ctx,
            channel.guild_id,
            GuildEvent::ChannelDeleted {
                name: channel.name.clone(),
            },
        )
        .await;
    }

    async fn guild_role_delete(
        &self,
        ctx: Context,
        guild_id: GuildId,
        removed_role_id: RoleId,
        removed_role_data_if_available: Option<Role>,
    ) {
        let name = removed_role_data_if_available
            .map(|role| role.name)
            .unwrap_or_else(|| removed_role_id.to_string());
        self.guard(&ctx, guild_id, GuildEvent::RoleDeleted { name })
            .await;
    }

    async fn guild_role_update(
        &self,
        ctx: Context,
        old_data_if_available: Option<Role>,
        new: Role,
    ) {
        // Report the pre-update name when the cache still has it.
        let name = old_data_if_available
            .map(|role| role.name)
            .unwrap_or_else(|| new.name.clone());
        self.guard(&ctx, new.guild_id, GuildEvent::RoleUpdated { name })
            .await;
    }
}

/// Connect to the gateway and run until the client stops.
pub async fn run(config: Arc<Config>, state: Arc<GuardState>, token: &str) -> anyhow::Result<()> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MODERATION
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(config, state);
    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;
    client.start().await?;
    Ok(())
}
