//! # cortana-presence
//!
//! Clubroom status engine. Keeps three views of "is the clubroom open" in
//! step: the in-memory [`StatusStore`], the bot-owned segment of a channel
//! topic ([`TopicCodec`]), and the presence marker file shared with the
//! button/LED process ([`PresenceSignal`]).

pub mod parser;
pub mod reconciler;
pub mod signal;
pub mod status;
pub mod store;
pub mod topic;

pub use parser::{CommandParser, Keyword, ParsedCommand};
pub use reconciler::{Input, Reconciler, Resync, Transition};
pub use signal::{FilePresence, PresenceSignal};
pub use status::{ClubStatus, StatusRecord};
pub use store::StatusStore;
pub use topic::{DecodedTopic, TopicCodec};
