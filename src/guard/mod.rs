//! Guard core: event attribution, enforcement, log-channel resolution.

pub mod enforce;
pub mod events;
pub mod logchan;
