//! vigil - guild-protection bot for Discord
//!
//! Watches moderation actions (bans, kicks, channel and role changes),
//! attributes each to an executor via the guild audit log, and auto-bans
//! executors acting without authorization. Core logic is written against
//! the [`platform::Platform`] capability trait so it can be exercised
//! without a live gateway connection.

pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod http;
pub mod metrics;
pub mod platform;
pub mod state;
