//! Integration test common infrastructure.
//!
//! Provides an in-memory [`Platform`] implementation that records every
//! side effect so tests can assert on bans, deletions, and log messages
//! without a live gateway.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use vigil::error::PlatformError;
use vigil::platform::{AuditKind, Platform};

/// In-memory platform double. Single-guild by construction; audit state
/// is keyed by action kind only.
pub struct MockPlatform {
    /// Latest audit-log executor per action kind.
    pub audit: Mutex<HashMap<AuditKind, UserId>>,
    /// Members holding administrator permission.
    pub admins: Mutex<Vec<UserId>>,
    /// Existing text channels, id -> name.
    pub channels: Mutex<HashMap<ChannelId, String>>,
    /// Recorded bans: (user, reason).
    pub bans: Mutex<Vec<(UserId, String)>>,
    /// Recorded channel deletions.
    pub deleted: Mutex<Vec<ChannelId>>,
    /// Recorded channel creations: (id, name).
    pub created: Mutex<Vec<(ChannelId, String)>>,
    /// Recorded messages: (channel, text).
    pub messages: Mutex<Vec<(ChannelId, String)>>,
    /// Induced failures.
    pub fail_audit: AtomicBool,
    pub fail_admin: AtomicBool,
    pub fail_ban: AtomicBool,
    pub fail_create: AtomicBool,
    next_channel: AtomicU64,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            audit: Mutex::new(HashMap::new()),
            admins: Mutex::new(Vec::new()),
            channels: Mutex::new(HashMap::new()),
            bans: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            fail_audit: AtomicBool::new(false),
            fail_admin: AtomicBool::new(false),
            fail_ban: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            next_channel: AtomicU64::new(9000),
        }
    }
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the most recent audit entry for an action kind.
    pub fn seed_audit(&self, kind: AuditKind, executor: UserId) {
        self.audit.lock().unwrap().insert(kind, executor);
    }

    pub fn grant_admin(&self, user: UserId) {
        self.admins.lock().unwrap().push(user);
    }

    pub fn add_text_channel(&self, id: ChannelId, name: &str) {
        self.channels.lock().unwrap().insert(id, name.to_string());
    }

    pub fn ban_count(&self) -> usize {
        self.bans.lock().unwrap().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn latest_audit_actor(
        &self,
        _guild: GuildId,
        kind: AuditKind,
    ) -> Result<Option<UserId>, PlatformError> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("audit log down".into()));
        }
        Ok(self.audit.lock().unwrap().get(&kind).copied())
    }

    async fn is_admin(&self, _guild: GuildId, user: UserId) -> Result<bool, PlatformError> {
        if self.fail_admin.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("member lookup down".into()));
        }
        Ok(self.admins.lock().unwrap().contains(&user))
    }

    async fn ban(
        &self,
        _guild: GuildId,
        user: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        if self.fail_ban.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("missing ban permission".into()));
        }
        self.bans.lock().unwrap().push((user, reason.to_string()));
        Ok(())
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError> {
        self.channels.lock().unwrap().remove(&channel);
        self.deleted.lock().unwrap().push(channel);
        Ok(())
    }

    async fn channel_exists(
        &self,
        _guild: GuildId,
        channel: ChannelId,
    ) -> Result<bool, PlatformError> {
        Ok(self.channels.lock().unwrap().contains_key(&channel))
    }

    async fn find_text_channel(
        &self,
        _guild: GuildId,
        name: &str,
    ) -> Result<Option<ChannelId>, PlatformError> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id))
    }

    async fn create_text_channel(
        &self,
        _guild: GuildId,
        name: &str,
    ) -> Result<ChannelId, PlatformError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable(
                "missing manage-channels permission".into(),
            ));
        }
        let id = ChannelId::new(self.next_channel.fetch_add(1, Ordering::SeqCst));
        self.channels.lock().unwrap().insert(id, name.to_string());
        self.created.lock().unwrap().push((id, name.to_string()));
        Ok(id)
    }

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel, text.to_string()));
        Ok(())
    }
}
