//! Unified error handling for vigil.
//!
//! Two error families cover everything the bot does at runtime: platform
//! request failures (swallowed per policy, but labeled for metrics) and
//! command-surface rejections (mapped to user-visible replies).

use thiserror::Error;

/// Errors from the chat-platform capability layer.
///
/// Enforcement and log-channel code swallows these by policy, but every
/// swallow is logged and counted under the `error_code()` label.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform request failed: {0}")]
    Api(#[from] serenity::Error),

    /// The platform could not serve the request (used by test doubles and
    /// for induced failures).
    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

impl PlatformError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Api(_) => "api_error",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Command-surface rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("invoker is not the owner")]
    NotOwner,

    #[error("missing argument")]
    MissingArg(&'static str),

    #[error("bad channel argument: {0}")]
    BadChannel(String),

    #[error("bad member argument: {0}")]
    BadMember(String),
}

impl CommandError {
    /// Convert to the reply text sent back to the invoker.
    pub fn to_reply(&self) -> String {
        match self {
            Self::NotOwner => "❌ You are not allowed to use this command.".to_string(),
            Self::MissingArg(usage) => format!("⚠️ Usage: {usage}"),
            Self::BadChannel(arg) => format!("⚠️ Not a channel: {arg}"),
            Self::BadMember(arg) => format!("⚠️ Not a member: {arg}"),
        }
    }
}
