//! Shared guard state.
//!
//! One explicitly constructed [`GuardState`] is handed to every event
//! handler and command. Nothing here persists; the trusted set resets to
//! the owner alone on restart.

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use serenity::model::id::{ChannelId, GuildId, UserId};

/// Process-wide mutable guard state.
///
/// All maps are concurrent: serenity dispatches events from multiple
/// tasks, so check-and-record operations must not race.
pub struct GuardState {
    /// The designated owner. Implicitly authorized and exempt from
    /// enforcement regardless of the trusted set.
    owner: UserId,

    /// Actors pre-authorized to perform moderation actions.
    trusted: DashSet<UserId>,

    /// Last-punishment unix timestamp per actor.
    cooldowns: DashMap<UserId, i64>,

    /// Configured log channel per guild.
    log_channels: DashMap<GuildId, ChannelId>,
}

impl GuardState {
    /// Create guard state bootstrapped with the owner in the trusted set.
    pub fn new(owner: UserId) -> Self {
        let trusted = DashSet::new();
        trusted.insert(owner);
        Self {
            owner,
            trusted,
            cooldowns: DashMap::new(),
            log_channels: DashMap::new(),
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn is_owner(&self, actor: UserId) -> bool {
        actor == self.owner
    }

    pub fn is_trusted(&self, actor: UserId) -> bool {
        self.trusted.contains(&actor)
    }

    /// Authorization check: owner, trusted, or live administrator.
    /// Pure over current state.
    pub fn authorized(&self, actor: UserId, is_admin: bool) -> bool {
        self.is_owner(actor) || self.is_trusted(actor) || is_admin
    }

    /// Add an actor to the trusted set. Returns false if already present.
    pub fn trust(&self, actor: UserId) -> bool {
        self.trusted.insert(actor)
    }

    /// Remove an actor from the trusted set. The owner stays implicitly
    /// authorized even if removed here.
    pub fn untrust(&self, actor: UserId) -> bool {
        self.trusted.remove(&actor).is_some()
    }

    /// Trusted ids, sorted for stable display.
    pub fn trusted_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.trusted.iter().map(|id| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Cooldown check-and-record in one entry operation.
    ///
    /// Returns true when punishment may proceed (and records `now` as the
    /// actor's last-punishment time), false when the actor was punished
    /// within the last `window` seconds. The single entry lock is what
    /// keeps two overlapping events from double-punishing one actor.
    pub fn begin_cooldown(&self, actor: UserId, now: i64, window: i64) -> bool {
        match self.cooldowns.entry(actor) {
            Entry::Occupied(mut e) => {
                if now - *e.get() < window {
                    false
                } else {
                    e.insert(now);
                    true
                }
            }
            Entry::Vacant(e) => {
                e.insert(now);
                true
            }
        }
    }

    /// Evict cooldown entries older than the window. Returns the number
    /// removed. Called periodically so the table does not grow for the
    /// process lifetime.
    pub fn prune_cooldowns(&self, now: i64, window: i64) -> usize {
        // Counted inside the closure: the table is mutated concurrently by
        // event handlers, so two len() snapshots can disagree.
        let mut removed = 0;
        self.cooldowns.retain(|_, last| {
            if now - *last < window {
                true
            } else {
                removed += 1;
                false
            }
        });
        removed
    }

    pub fn set_log_channel(&self, guild: GuildId, channel: ChannelId) {
        self.log_channels.insert(guild, channel);
    }

    pub fn log_channel(&self, guild: GuildId) -> Option<ChannelId> {
        self.log_channels.get(&guild).map(|c| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GuardState {
        GuardState::new(UserId::new(1))
    }

    #[test]
    fn test_owner_always_authorized() {
        let s = state();
        s.untrust(UserId::new(1));
        assert!(s.authorized(UserId::new(1), false));
    }

    #[test]
    fn test_authorization_truth_table() {
        let s = state();
        let nobody = UserId::new(5);
        assert!(!s.authorized(nobody, false));
        assert!(s.authorized(nobody, true));
        s.trust(nobody);
        assert!(s.authorized(nobody, false));
        s.untrust(nobody);
        assert!(!s.authorized(nobody, false));
    }

    #[test]
    fn test_cooldown_window() {
        let s = state();
        let actor = UserId::new(9);
        assert!(s.begin_cooldown(actor, 1000, 15));
        // Within the window: suppressed.
        assert!(!s.begin_cooldown(actor, 1010, 15));
        // Window elapsed: proceeds and re-records.
        assert!(s.begin_cooldown(actor, 1015, 15));
        assert!(!s.begin_cooldown(actor, 1016, 15));
    }

    #[test]
    fn test_cooldown_is_per_actor() {
        let s = state();
        assert!(s.begin_cooldown(UserId::new(9), 1000, 15));
        assert!(s.begin_cooldown(UserId::new(10), 1000, 15));
    }

    #[test]
    fn test_prune_cooldowns() {
        let s = state();
        s.begin_cooldown(UserId::new(9), 1000, 15);
        s.begin_cooldown(UserId::new(10), 1010, 15);
        let removed = s.prune_cooldowns(1016, 15);
        assert_eq!(removed, 1);
        // The pruned actor may be punished again immediately.
        assert!(s.begin_cooldown(UserId::new(9), 1016, 15));
    }

    #[test]
    fn test_prune_counts_under_concurrent_inserts() {
        use std::sync::Arc;

        let s = Arc::new(state());
        let writer = {
            let s = Arc::clone(&s);
            std::thread::spawn(move || {
                for i in 2..2_000u64 {
                    s.begin_cooldown(UserId::new(i), 2_000, 15);
                }
            })
        };
        // Interleave pruning with the writer; every stamped entry is stale
        // relative to now = 3_000, so each pass may remove any number of
        // entries but must never panic or report a wrapped count.
        for _ in 0..200 {
            let removed = s.prune_cooldowns(3_000, 15);
            assert!(removed < 2_000);
        }
        writer.join().expect("writer thread");
    }

    #[test]
    fn test_trusted_ids_sorted() {
        let s = state();
        s.trust(UserId::new(30));
        s.trust(UserId::new(2));
        assert_eq!(
            s.trusted_ids(),
            vec![UserId::new(1), UserId::new(2), UserId::new(30)]
        );
    }

    #[test]
    fn test_log_channel_roundtrip() {
        let s = state();
        let guild = GuildId::new(77);
        assert_eq!(s.log_channel(guild), None);
        s.set_log_channel(guild, ChannelId::new(88));
        assert_eq!(s.log_channel(guild), Some(ChannelId::new(88)));
    }
}
