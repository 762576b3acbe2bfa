//! IRC channel.
//!
//! Plain TCP line protocol: registers, joins the configured channels,
//! answers pings, keeps track of channel topics, and turns chat lines and
//! topic changes into [`IncomingEvent`](cortana_core::message::IncomingEvent)s.

mod connection;
pub mod protocol;
mod session;


use cortana_core::config::IrcConfig;
use session::SessionState;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// IRC transport.
pub struct IrcChannel {
    config: IrcConfig,
    /// Protocol state shared between the reader task and callers.
    state: Arc<Mutex<SessionState>>,
    /// Write half of the live connection, `None` while disconnected.
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    /// Set by `stop()`; the reader task exits instead of reconnecting.
    shutdown: Arc<AtomicBool>,
}

impl IrcChannel {
    /// Create a new IRC channel from config.
    pub fn new(config: IrcConfig) -> Self {
        let state = SessionState::new(&config.nick, &config.channels);
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            writer: Arc::new(Mutex::new(None)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}
