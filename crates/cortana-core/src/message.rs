use chrono::{DateTime, Utc};

/// An event delivered by a chat transport.
#[derive(Debug, Clone)]
pub enum IncomingEvent {
    /// A chat line addressed to a channel the bot sits on.
    Message(IncomingMessage),
    /// The bot finished joining a channel. `topic` is the topic the server
    /// reported on join, if any.
    Joined {
        channel: String,
        topic: Option<String>,
    },
    /// Somebody changed a channel topic.
    TopicChanged {
        channel: String,
        topic: String,
        /// Nickname of whoever set the topic.
        setter: String,
    },
}

/// An incoming chat line.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Transport name (e.g. "irc").
    pub transport: String,
    /// Chat channel the line was sent to (e.g. "#polygame").
    pub channel: String,
    /// Nickname of the sender.
    pub sender: String,
    /// Message text content.
    pub text: String,
    /// When the transport received the line. Command cooldowns run on this.
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    /// Build a message stamped with the current time.
    pub fn new(transport: &str, channel: &str, sender: &str, text: &str) -> Self {
        Self {
            transport: transport.to_string(),
            channel: channel.to_string(),
            sender: sender.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// An outgoing chat line.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    /// Target chat channel or nickname.
    pub target: String,
    pub text: String,
}
