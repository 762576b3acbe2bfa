use thiserror::Error;

/// Top-level error type for Cortana.
#[derive(Debug, Error)]
pub enum CortanaError {
    /// Error from a chat transport.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Reconciliation requested for a chat channel that was never registered.
    #[error("channel not tracked: {0}")]
    UntrackedChannel(String),

    /// Transport is not currently joined to the target chat channel.
    #[error("not joined to {0}")]
    NotJoined(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
