use crate::{
    error::CortanaError,
    message::{IncomingEvent, OutgoingMessage},
};
use async_trait::async_trait;

/// Chat transport trait.
///
/// A transport delivers inbound chat events, publishes lines, and owns the
/// topic strings of the channels it has joined.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Start the transport.
    /// Returns a receiver that yields inbound events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingEvent>, CortanaError>;

    /// Send a line to a channel or user.
    async fn send(&self, message: OutgoingMessage) -> Result<(), CortanaError>;

    /// Last known topic of `channel`, or `None` when not joined to it.
    async fn topic(&self, channel: &str) -> Option<String>;

    /// Publish a new topic. Fails with [`CortanaError::NotJoined`] when the
    /// transport is not on `channel`.
    async fn set_topic(&self, channel: &str, topic: &str) -> Result<(), CortanaError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), CortanaError>;
}
