//! Configuration loading and management.
//!
//! A single TOML file (`config.toml` by default) carries the bot identity,
//! guard tuning, and the keep-alive HTTP listener settings. The token may
//! instead come from the `DISCORD_TOKEN` environment variable.

use serde::Deserialize;
use serenity::model::id::UserId;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity (token, owner, command prefix).
    pub bot: BotConfig,
    /// Guard tuning (cooldown window, log channel name).
    #[serde(default)]
    pub guard: GuardConfig,
    /// Keep-alive HTTP listener.
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.owner_id == 0 {
            return Err(ConfigError::Invalid("bot.owner_id must be set"));
        }
        if self.guard.cooldown_secs < 0 {
            return Err(ConfigError::Invalid("guard.cooldown_secs must be >= 0"));
        }
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::Invalid("bot.prefix must not be empty"));
        }
        Ok(())
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Gateway token. Falls back to the `DISCORD_TOKEN` environment
    /// variable when absent, so tokens can stay out of the config file.
    pub token: Option<String>,
    /// The designated owner. Always authorized, exempt from enforcement,
    /// and the only invoker accepted for gated commands.
    pub owner_id: u64,
    /// Text command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl BotConfig {
    /// The owner as a typed id.
    pub fn owner(&self) -> UserId {
        UserId::new(self.owner_id)
    }
}

/// Guard tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    /// Per-actor punishment cooldown in seconds. Overlapping events for a
    /// single real-world action land within this window and collapse to
    /// one punishment.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: i64,
    /// Conventional name for the fallback log channel.
    #[serde(default = "default_log_channel_name")]
    pub log_channel_name: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            log_channel_name: default_log_channel_name(),
        }
    }
}

/// Keep-alive HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Listen port for the liveness/metrics endpoint.
    /// Convention: port = 0 disables the listener (used by tests).
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_cooldown_secs() -> i64 {
    15
}

fn default_log_channel_name() -> String {
    "security-logs".to_string()
}

fn default_http_port() -> u16 {
    8080
}
