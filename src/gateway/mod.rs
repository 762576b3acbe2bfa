//! Gateway: the single actor that owns the clubroom state.
//!
//! Inbound chat events and poll ticks are handled one at a time from a
//! single `select!` loop, so no transition ever interleaves with another.

mod poll;
mod routing;


use cortana_core::{
    config::{ClubroomConfig, Config, IrcConfig},
    error::CortanaError,
    message::OutgoingMessage,
    traits::Channel,
};
use cortana_presence::{
    CommandParser, Input, PresenceSignal, Reconciler, StatusRecord, StatusStore, TopicCodec,
    Transition,
};
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Routes chat events, poll ticks and resyncs for every tracked channel.
pub struct Gateway {
    channel: Arc<dyn Channel>,
    presence: Arc<dyn PresenceSignal>,
    store: StatusStore,
    reconciler: Reconciler,
    codec: TopicCodec,
    parser: CommandParser,
    irc_config: IrcConfig,
    clubroom_config: ClubroomConfig,
    /// Receive time of the last accepted command per channel, for the
    /// cooldown.
    last_command: HashMap<String, DateTime<Utc>>,
}

impl Gateway {
    /// Create a new gateway. Every configured channel is registered up front.
    pub fn new(
        channel: Arc<dyn Channel>,
        presence: Arc<dyn PresenceSignal>,
        config: &Config,
    ) -> Result<Self, CortanaError> {
        let clubroom = &config.clubroom;
        let mut store = StatusStore::new();
        for name in &config.irc.channels {
            store.register(name);
        }
        Ok(Self {
            channel,
            presence,
            store,
            reconciler: Reconciler::from_config(clubroom)?,
            codec: TopicCodec::new(&clubroom.status_prefix, &clubroom.topic_separator),
            parser: CommandParser::new(&config.irc.names(), &clubroom.command_prefix),
            irc_config: config.irc.clone(),
            clubroom_config: clubroom.clone(),
            last_command: HashMap::new(),
        })
    }

    /// Run the main event loop until Ctrl-C or the transport goes away.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            "Cortana gateway running | transport: {} | channels: {} | poll: {}s",
            self.channel.name(),
            self.store.channels().join(", "),
            self.clubroom_config.poll_interval_secs,
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;

        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.clubroom_config.poll_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("transport closed its event stream");
                        break;
                    }
                },
                _ = ticker.tick() => self.poll_tick().await,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn shutdown(&self) {
        info!("Shutting down...");
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Shutdown complete.");
    }

    /// Run one input through the state machine. Untracked channels are
    /// reported and produce no transition.
    fn reconcile(&mut self, channel: &str, input: Input, source: &str) -> Option<Transition> {
        let before = self.store.get(channel).ok().cloned();
        match self.reconciler.apply(&mut self.store, channel, &input) {
            Ok(transition) => {
                if before.as_ref() != Some(&transition.record) {
                    info!(
                        "{channel}: {source} -> {} (presence: {})",
                        self.codec.announcement(&transition.record),
                        transition.record.presence()
                    );
                }
                Some(transition)
            }
            Err(e) => {
                error!("{source} for {channel} dropped: {e}");
                None
            }
        }
    }

    /// Bring the topic and presence file in line with a transition.
    async fn resync(&self, channel: &str, transition: &Transition) {
        if transition.resync.topic {
            self.publish_topic(channel, &transition.record).await;
        }
        if transition.resync.presence {
            self.write_presence(channel, &transition.record);
        }
    }

    /// Rewrite segment 0 of the channel topic. Skipped while not joined; the
    /// next triggering event tries again.
    async fn publish_topic(&self, channel: &str, record: &StatusRecord) {
        let Some(current) = self.channel.topic(channel).await else {
            debug!("{channel}: not joined, topic update skipped");
            return;
        };
        let topic = self.codec.apply(&current, record);
        if topic == current {
            debug!("{channel}: topic already up to date");
            return;
        }
        match self.channel.set_topic(channel, &topic).await {
            Ok(()) => info!("{channel}: topic set to {topic:?}"),
            Err(CortanaError::NotJoined(_)) => {
                debug!("{channel}: not joined, topic update skipped")
            }
            Err(e) => warn!("{channel}: failed to set topic: {e}"),
        }
    }

    fn write_presence(&self, channel: &str, record: &StatusRecord) {
        if let Err(e) = self.presence.set(channel, record.presence()) {
            warn!("{channel}: failed to update presence marker: {e}");
        }
    }

    /// Send a plain text line to a channel.
    async fn send_text(&self, target: &str, text: &str) {
        let msg = OutgoingMessage {
            target: target.to_string(),
            text: text.to_string(),
        };
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to send message: {e}");
        }
    }
}
