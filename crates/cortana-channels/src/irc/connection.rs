//! Connection loop and Channel trait implementation.

use super::protocol::{format_line, IrcMessage};
use super::session::SessionState;
use super::IrcChannel;
use async_trait::async_trait;
use cortana_core::{
    config::IrcConfig,
    error::CortanaError,
    message::{IncomingEvent, OutgoingMessage},
    traits::Channel,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

type Writer = Arc<Mutex<Option<OwnedWriteHalf>>>;

#[async_trait]
impl Channel for IrcChannel {
    fn name(&self) -> &str {
        "irc"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, CortanaError> {
        if self.config.channels.is_empty() {
            return Err(CortanaError::Channel("no IRC channels configured".into()));
        }

        let (tx, rx) = mpsc::channel(64);
        let config = self.config.clone();
        let state = self.state.clone();
        let writer = self.writer.clone();
        let shutdown = self.shutdown.clone();

        info!(
            "IRC channel connecting to {}:{} as {}...",
            config.server, config.port, config.nick
        );

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let result =
                    run_session(&config, &state, &writer, &tx, &mut backoff_secs).await;

                writer.lock().await.take();
                state.lock().await.reset(&config.nick);

                if shutdown.load(Ordering::Relaxed) || tx.is_closed() {
                    info!("irc: connection loop stopped");
                    break;
                }

                match result {
                    Ok(()) => warn!("irc: connection closed (retry in {backoff_secs}s)"),
                    Err(e) => error!("irc: connection error (retry in {backoff_secs}s): {e}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(60);
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), CortanaError> {
        for line in message.text.lines().filter(|l| !l.is_empty()) {
            write_line(
                &self.writer,
                &format_line("PRIVMSG", &[message.target.as_str()], Some(line)),
            )
            .await?;
        }
        Ok(())
    }

    async fn topic(&self, channel: &str) -> Option<String> {
        self.state.lock().await.topic(channel)
    }

    async fn set_topic(&self, channel: &str, topic: &str) -> Result<(), CortanaError> {
        let topic = {
            let state = self.state.lock().await;
            if !state.is_joined(channel) {
                return Err(CortanaError::NotJoined(channel.to_string()));
            }
            let fitted = state.fit_topic(topic);
            if fitted.len() < topic.len() {
                warn!("irc: topic for {channel} cut to {} bytes", fitted.len());
            }
            fitted
        };
        write_line(
            &self.writer,
            &format_line("TOPIC", &[channel], Some(topic)),
        )
        .await?;
        // The server echo overwrites this again with what it actually kept.
        self.state.lock().await.set_topic(channel, topic);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CortanaError> {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Err(e) = write_line(&self.writer, &format_line("QUIT", &[], Some("bye"))).await {
            debug!("irc: quit not sent: {e}");
        }
        if let Some(mut w) = self.writer.lock().await.take() {
            let _ = w.shutdown().await;
        }
        info!("IRC channel stopped");
        Ok(())
    }
}

/// One connection: register, then pump lines until EOF or error.
async fn run_session(
    config: &IrcConfig,
    state: &Arc<Mutex<SessionState>>,
    writer: &Writer,
    tx: &mpsc::Sender<IncomingEvent>,
    backoff_secs: &mut u64,
) -> Result<(), CortanaError> {
    let stream = TcpStream::connect((config.server.as_str(), config.port)).await?;
    let (read_half, write_half) = stream.into_split();
    *writer.lock().await = Some(write_half);

    if !config.password.is_empty() {
        write_line(writer, &format_line("PASS", &[config.password.as_str()], None)).await?;
    }
    write_line(writer, &format_line("NICK", &[config.nick.as_str()], None)).await?;
    write_line(
        writer,
        &format_line("USER", &[config.nick.as_str(), "0", "*"], Some(&config.realname)),
    )
    .await?;

    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        // Not every client speaks UTF-8.
        let line = String::from_utf8_lossy(&buf);
        let Some(msg) = IrcMessage::parse(&line) else {
            continue;
        };

        let reaction = {
            let mut st = state.lock().await;
            let was_registered = st.registered;
            let reaction = st.handle(&msg);
            if st.registered && !was_registered {
                // Successful registration -- reset backoff.
                *backoff_secs = 1;
            }
            reaction
        };

        for reply in &reaction.replies {
            write_line(writer, reply).await?;
        }
        for event in reaction.events {
            if tx.send(event).await.is_err() {
                info!("irc: gateway receiver dropped, closing connection");
                return Ok(());
            }
        }
    }
}

async fn write_line(writer: &Writer, line: &str) -> Result<(), CortanaError> {
    let mut guard = writer.lock().await;
    let w = guard
        .as_mut()
        .ok_or_else(|| CortanaError::Channel("not connected".into()))?;
    w.write_all(format!("{line}\r\n").as_bytes()).await?;
    w.flush().await?;
    Ok(())
}
