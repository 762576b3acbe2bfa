use serde::{Deserialize, Serialize};

use super::defaults::*;

/// IRC transport config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrcConfig {
    #[serde(default = "default_irc_server")]
    pub server: String,
    #[serde(default = "default_irc_port")]
    pub port: u16,
    #[serde(default = "default_nick")]
    pub nick: String,
    /// Extra names the bot answers to in addressed commands.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Server password sent with `PASS`. Empty = none.
    #[serde(default)]
    pub password: String,
    /// Channels to join and track.
    #[serde(default = "default_irc_channels")]
    pub channels: Vec<String>,
    /// Senders allowed to carry relay-bridged commands. Empty = anyone.
    #[serde(default)]
    pub relay_nicks: Vec<String>,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: default_irc_server(),
            port: default_irc_port(),
            nick: default_nick(),
            aliases: Vec::new(),
            realname: default_realname(),
            password: String::new(),
            channels: default_irc_channels(),
            relay_nicks: Vec::new(),
        }
    }
}

impl IrcConfig {
    /// The nick plus all aliases.
    pub fn names(&self) -> Vec<String> {
        std::iter::once(self.nick.clone())
            .chain(self.aliases.iter().cloned())
            .collect()
    }

    /// Whether relay-bridged commands from `sender` are accepted.
    pub fn is_relay(&self, sender: &str) -> bool {
        self.relay_nicks.is_empty()
            || self
                .relay_nicks
                .iter()
                .any(|n| n.eq_ignore_ascii_case(sender))
    }
}
