//! Protocol state machine, independent of the socket.

use super::protocol::{format_line, is_channel, IrcMessage};
use cortana_core::message::{IncomingEvent, IncomingMessage};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What the connection should do after one inbound line.
#[derive(Debug, Default)]
pub(crate) struct Reaction {
    /// Lines to write back to the server.
    pub replies: Vec<String>,
    /// Events for the gateway.
    pub events: Vec<IncomingEvent>,
}

/// Per-connection protocol state.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// Nick currently in use (may gain `_` suffixes on collisions).
    pub nick: String,
    /// Channels to join after registration.
    wanted: Vec<String>,
    /// Joined channels (lowercased) → last known topic.
    joined: HashMap<String, String>,
    /// Server topic limit in bytes (ISUPPORT `TOPICLEN`), once announced.
    topic_len: Option<usize>,
    pub registered: bool,
}

impl SessionState {
    pub fn new(nick: &str, channels: &[String]) -> Self {
        Self {
            nick: nick.to_string(),
            wanted: channels.to_vec(),
            joined: HashMap::new(),
            topic_len: None,
            registered: false,
        }
    }

    /// Forget everything tied to the previous connection.
    pub fn reset(&mut self, nick: &str) {
        self.nick = nick.to_string();
        self.joined.clear();
        self.topic_len = None;
        self.registered = false;
    }

    pub fn is_joined(&self, channel: &str) -> bool {
        self.joined.contains_key(&channel.to_lowercase())
    }

    pub fn topic(&self, channel: &str) -> Option<String> {
        self.joined.get(&channel.to_lowercase()).cloned()
    }

    /// Cut `topic` to what the server will keep, on a char boundary.
    pub fn fit_topic<'a>(&self, topic: &'a str) -> &'a str {
        let Some(limit) = self.topic_len else {
            return topic;
        };
        if topic.len() <= limit {
            return topic;
        }
        let mut end = limit;
        while !topic.is_char_boundary(end) {
            end -= 1;
        }
        &topic[..end]
    }

    /// Remember a topic we just published, ahead of the server echo.
    pub fn set_topic(&mut self, channel: &str, topic: &str) {
        if let Some(slot) = self.joined.get_mut(&channel.to_lowercase()) {
            *slot = topic.to_string();
        }
    }

    fn is_me(&self, nick: Option<&str>) -> bool {
        nick.is_some_and(|n| n.eq_ignore_ascii_case(&self.nick))
    }

    /// Handle one inbound message.
    pub fn handle(&mut self, msg: &IrcMessage) -> Reaction {
        let mut out = Reaction::default();
        match msg.command.as_str() {
            "PING" => {
                out.replies
                    .push(format_line("PONG", &[], Some(msg.param(0).unwrap_or_default())));
            }
            // RPL_WELCOME
            "001" => {
                self.registered = true;
                if let Some(nick) = msg.param(0) {
                    self.nick = nick.to_string();
                }
                info!("irc: registered as {}", self.nick);
                for channel in &self.wanted {
                    out.replies.push(format_line("JOIN", &[channel.as_str()], None));
                }
            }
            // RPL_ISUPPORT
            "005" => {
                let topic_len = msg
                    .params
                    .iter()
                    .filter_map(|p| p.strip_prefix("TOPICLEN="))
                    .find_map(|n| n.parse::<usize>().ok());
                if let Some(len) = topic_len {
                    debug!("irc: server topic limit is {len} bytes");
                    self.topic_len = Some(len);
                }
            }
            // ERR_NICKNAMEINUSE
            "433" if !self.registered => {
                self.nick.push('_');
                warn!("irc: nick in use, retrying as {}", self.nick);
                out.replies.push(format_line("NICK", &[self.nick.as_str()], None));
            }
            "NICK" if self.is_me(msg.nick()) => {
                if let Some(new) = msg.param(0) {
                    self.nick = new.to_string();
                }
            }
            "JOIN" if self.is_me(msg.nick()) => {
                if let Some(channel) = msg.param(0) {
                    self.joined.entry(channel.to_lowercase()).or_default();
                    debug!("irc: joined {channel}");
                }
            }
            "PART" if self.is_me(msg.nick()) => {
                if let Some(channel) = msg.param(0) {
                    self.joined.remove(&channel.to_lowercase());
                    info!("irc: left {channel}");
                }
            }
            "KICK" => {
                if let (Some(channel), Some(target)) = (msg.param(0), msg.param(1)) {
                    if self.is_me(Some(target)) {
                        self.joined.remove(&channel.to_lowercase());
                        warn!("irc: kicked from {channel}, rejoining");
                        out.replies.push(format_line("JOIN", &[channel], None));
                    }
                }
            }
            // RPL_TOPIC
            "332" => {
                if let (Some(channel), Some(topic)) = (msg.param(1), msg.param(2)) {
                    self.set_topic(channel, topic);
                }
            }
            // RPL_NOTOPIC
            "331" => {
                if let Some(channel) = msg.param(1) {
                    self.set_topic(channel, "");
                }
            }
            // RPL_ENDOFNAMES closes the join burst.
            "366" => {
                if let Some(channel) = msg.param(1) {
                    if let Some(topic) = self.topic(channel) {
                        out.events.push(IncomingEvent::Joined {
                            channel: channel.to_string(),
                            topic: if topic.is_empty() { None } else { Some(topic) },
                        });
                    }
                }
            }
            // ERR_CHANOPRIVSNEEDED: our cached topic is now wrong, ask again.
            "482" => {
                if let Some(channel) = msg.param(1) {
                    warn!("irc: no permission to change the topic of {channel}");
                    out.replies.push(format_line("TOPIC", &[channel], None));
                }
            }
            "TOPIC" => {
                if let (Some(channel), Some(topic)) = (msg.param(0), msg.param(1)) {
                    self.set_topic(channel, topic);
                    out.events.push(IncomingEvent::TopicChanged {
                        channel: channel.to_string(),
                        topic: topic.to_string(),
                        setter: msg.nick().unwrap_or_default().to_string(),
                    });
                }
            }
            "PRIVMSG" => {
                if let (Some(target), Some(text), Some(sender)) =
                    (msg.param(0), msg.param(1), msg.nick())
                {
                    // CTCP (ACTION, VERSION, ...) is not chat.
                    if is_channel(target) && !text.starts_with('\x01') && !self.is_me(Some(sender))
                    {
                        out.events.push(IncomingEvent::Message(IncomingMessage::new(
                            "irc", target, sender, text,
                        )));
                    }
                }
            }
            _ => {}
        }
        out
    }
}
