//! Inbound event routing: chat commands, joins and topic changes.

use super::Gateway;
use cortana_core::message::{IncomingEvent, IncomingMessage};
use cortana_presence::{Input, ParsedCommand};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

impl Gateway {
    pub(super) async fn handle_event(&mut self, event: IncomingEvent) {
        match event {
            IncomingEvent::Message(msg) => self.handle_message(msg).await,
            IncomingEvent::Joined { channel, topic } => {
                if self.store.register(&channel) {
                    info!("{channel}: tracking");
                }
                if let Some(topic) = topic {
                    self.observe_topic(&channel, &topic, "topic on join").await;
                }
            }
            IncomingEvent::TopicChanged {
                channel,
                topic,
                setter,
            } => {
                if self.is_own_nick(&setter) {
                    debug!("{channel}: ignoring echo of our own topic");
                    return;
                }
                let source = format!("topic by {setter}");
                self.observe_topic(&channel, &topic, &source).await;
            }
        }
    }

    async fn handle_message(&mut self, msg: IncomingMessage) {
        let Some(cmd) = self.parse_command(&msg) else {
            return;
        };
        if self.cooling_down(&msg.channel, msg.timestamp) {
            debug!(
                "{}: {} command from {} at {} ignored (cooldown)",
                msg.channel,
                msg.transport,
                msg.sender,
                msg.timestamp.format("%H:%M:%S")
            );
            return;
        }

        let source = format!("{} command by {}", msg.transport, msg.sender);
        let Some(transition) = self.reconcile(&msg.channel, Input::Command(cmd), &source) else {
            return;
        };
        self.last_command
            .insert(msg.channel.to_lowercase(), msg.timestamp);

        if transition.report {
            let text = self.codec.announcement(&transition.record);
            self.send_text(&msg.channel, &text).await;
        }
        self.resync(&msg.channel, &transition).await;
    }

    fn parse_command(&self, msg: &IncomingMessage) -> Option<ParsedCommand> {
        self.parser.parse(&msg.text).or_else(|| {
            if self.irc_config.is_relay(&msg.sender) {
                self.parser.parse_relayed(&msg.text)
            } else {
                None
            }
        })
    }

    /// Measured between receive timestamps, not handling times.
    fn cooling_down(&self, channel: &str, at: DateTime<Utc>) -> bool {
        let secs = self.clubroom_config.command_cooldown_secs;
        if secs == 0 {
            return false;
        }
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self.last_command
            .get(&channel.to_lowercase())
            .is_some_and(|last| at.signed_duration_since(*last).num_seconds() < secs)
    }

    /// Adopt a status somebody else wrote into the topic.
    async fn observe_topic(&mut self, channel: &str, topic: &str, source: &str) {
        let decoded = self.codec.decode(topic);
        let Some(status) = decoded.status else {
            debug!("{channel}: topic carries no status, nothing to adopt");
            return;
        };
        let input = Input::TopicObserved {
            status,
            extra: decoded.extra,
        };
        if let Some(transition) = self.reconcile(channel, input, source) {
            self.resync(channel, &transition).await;
        }
    }

    /// The transport may have picked `Nick_` after a collision.
    fn is_own_nick(&self, nick: &str) -> bool {
        let base = nick.trim_end_matches('_');
        self.irc_config
            .names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(base) || n.eq_ignore_ascii_case(nick))
    }
}
