//! Owner text-command surface.
//!
//! Prefix commands parsed from message content. `setlog`, `whitelist_add`
//! and `whitelist_remove` are owner-gated; `showlog` and `whitelist_show`
//! are open. Replies go back to the invoking channel through the platform
//! layer.

use crate::config::Config;
use crate::error::CommandError;
use crate::guard::logchan;
use crate::metrics;
use crate::platform::Platform;
use crate::state::GuardState;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::utils::{parse_channel_mention, parse_user_mention};
use tracing::{info, warn};

/// A parsed guard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetLog(ChannelId),
    ShowLog,
    WhitelistAdd(UserId),
    WhitelistRemove(UserId),
    WhitelistShow,
}

/// Coerce a channel argument: `<#id>` mention or raw id.
pub fn channel_arg(arg: Option<&str>, usage: &'static str) -> Result<ChannelId, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArg(usage))?;
    if let Some(channel) = parse_channel_mention(arg) {
        return Ok(channel);
    }
    match arg.parse::<u64>() {
        Ok(id) if id != 0 => Ok(ChannelId::new(id)),
        _ => Err(CommandError::BadChannel(arg.to_string())),
    }
}

/// Coerce a member argument: `<@id>` mention or raw id.
pub fn member_arg(arg: Option<&str>, usage: &'static str) -> Result<UserId, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArg(usage))?;
    if let Some(user) = parse_user_mention(arg) {
        return Ok(user);
    }
    match arg.parse::<u64>() {
        Ok(id) if id != 0 => Ok(UserId::new(id)),
        _ => Err(CommandError::BadMember(arg.to_string())),
    }
}

/// Parse a message into a command, gating on the invoker.
///
/// Returns None when the message is not a guard command at all. The owner
/// gate applies before argument coercion, so a non-owner always sees the
/// rejection rather than a usage error.
pub fn parse(
    prefix: &str,
    content: &str,
    invoker: UserId,
    owner: UserId,
) -> Option<Result<Command, CommandError>> {
    let rest = content.strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let verb = parts.next()?;
    let arg = parts.next();

    let gated = matches!(verb, "setlog" | "whitelist_add" | "whitelist_remove");
    if gated && invoker != owner {
        return Some(Err(CommandError::NotOwner));
    }

    let parsed = match verb {
        "setlog" => channel_arg(arg, "setlog <#channel>").map(Command::SetLog),
        "showlog" => Ok(Command::ShowLog),
        "whitelist_add" => member_arg(arg, "whitelist_add <member>").map(Command::WhitelistAdd),
        "whitelist_remove" => {
            member_arg(arg, "whitelist_remove <member>").map(Command::WhitelistRemove)
        }
        "whitelist_show" => Ok(Command::WhitelistShow),
        _ => return None,
    };
    Some(parsed)
}

/// Dispatch one message through the command surface.
///
/// Returns true when the message was recognized as a command (whether it
/// succeeded or was rejected). Reply failures are swallowed and counted
/// like every other platform error.
pub async fn dispatch(
    platform: &dyn Platform,
    state: &GuardState,
    config: &Config,
    guild: GuildId,
    channel: ChannelId,
    invoker: UserId,
    content: &str,
) -> bool {
    let owner = config.bot.owner();
    let reply = match parse(&config.bot.prefix, content, invoker, owner) {
        None => return false,
        Some(Err(e)) => e.to_reply(),
        Some(Ok(command)) => {
            info!(guild = guild.get(), invoker = invoker.get(), ?command, "Command received");
            run(platform, state, config, guild, command).await
        }
    };

    if let Err(e) = platform.send_message(channel, &reply).await {
        warn!(channel = channel.get(), error = %e, "Failed to send command reply");
        metrics::inc_swallowed("command_reply");
    }
    true
}

async fn run(
    platform: &dyn Platform,
    state: &GuardState,
    config: &Config,
    guild: GuildId,
    command: Command,
) -> String {
    match command {
        Command::SetLog(channel) => {
            metrics::inc_command("setlog");
            state.set_log_channel(guild, channel);
            format!("✅ Log channel set to <#{channel}>")
        }
        Command::ShowLog => {
            metrics::inc_command("showlog");
            // Pure read: reports what exists, never creates.
            let resolved = logchan::resolve_existing(
                platform,
                state,
                guild,
                &config.guard.log_channel_name,
            )
            .await;
            match resolved {
                Ok(Some(channel)) => format!("📑 Current log channel is <#{channel}>"),
                Ok(None) => "⚠️ No log channel found.".to_string(),
                Err(e) => {
                    warn!(guild = guild.get(), error = %e, "Log channel lookup failed");
                    metrics::inc_swallowed("resolve_log_channel");
                    "⚠️ No log channel found.".to_string()
                }
            }
        }
        Command::WhitelistAdd(user) => {
            metrics::inc_command("whitelist_add");
            state.trust(user);
            format!("✅ <@{user}> has been whitelisted.")
        }
        Command::WhitelistRemove(user) => {
            metrics::inc_command("whitelist_remove");
            state.untrust(user);
            format!("✅ <@{user}> has been removed from whitelist.")
        }
        Command::WhitelistShow => {
            metrics::inc_command("whitelist_show");
            let ids: Vec<String> = state
                .trusted_ids()
                .iter()
                .map(|id| id.to_string())
                .collect();
            format!("👥 Whitelisted IDs: {}", ids.join(", "))
        }
    }
}
