mod gateway;

use clap::{Parser, Subcommand};
use cortana_channels::irc::IrcChannel;
use cortana_core::config::{self, shellexpand, Config, CortanaConfig};
use cortana_presence::{FilePresence, PresenceSignal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "cortana",
    version,
    about = "Cortana — clubroom status bot for IRC"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to IRC and keep topic, status and presence file in sync.
    Start,
    /// Show configuration and the presence marker of every channel.
    Status,
    /// Inspect or flip a presence marker, like the clubroom button does.
    Presence {
        #[command(subcommand)]
        action: PresenceAction,
    },
}

#[derive(Subcommand)]
enum PresenceAction {
    /// Print whether the marker exists.
    Show {
        /// Channel (defaults to the first configured one).
        channel: Option<String>,
    },
    /// Create the marker if missing, remove it otherwise.
    Toggle {
        /// Channel (defaults to the first configured one).
        channel: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg.cortana)?;

    match cli.command {
        Commands::Start => {
            if cfg.irc.channels.is_empty() {
                anyhow::bail!("No channels configured. Add at least one to [irc] channels in config.toml.");
            }

            let presence = FilePresence::new(&cfg.clubroom.presence_file);
            let channel = IrcChannel::new(cfg.irc.clone());

            println!("Cortana — Starting bot...");
            let gw = gateway::Gateway::new(Arc::new(channel), Arc::new(presence), &cfg)?;
            gw.run().await?;
        }
        Commands::Status => print_status(&cli.config, &cfg),
        Commands::Presence { action } => {
            let presence = FilePresence::new(&cfg.clubroom.presence_file);
            match action {
                PresenceAction::Show { channel } => {
                    let channel = pick_channel(&cfg, channel)?;
                    println!(
                        "{channel}: {} ({})",
                        present_word(presence.is_present(&channel)),
                        presence.path_for(&channel).display()
                    );
                }
                PresenceAction::Toggle { channel } => {
                    let channel = pick_channel(&cfg, channel)?;
                    let now = presence.toggle(&channel)?;
                    println!("{channel}: {}", present_word(now));
                }
            }
        }
    }

    Ok(())
}

/// Console logging, plus a daily log file when enabled. `RUST_LOG` wins
/// over the configured level.
fn init_logging(cfg: &CortanaConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    if !cfg.log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        return Ok(None);
    }

    let dir = PathBuf::from(shellexpand(&cfg.data_dir)).join("logs");
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "cortana.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn print_status(config_path: &str, cfg: &Config) {
    println!("Cortana — Status Check\n");
    println!("Config: {config_path}");
    println!(
        "IRC: {}:{} as {}",
        cfg.irc.server, cfg.irc.port, cfg.irc.nick
    );
    println!("Status prefix: {:?}", cfg.clubroom.status_prefix);
    println!("Poll interval: {}s", cfg.clubroom.poll_interval_secs);
    println!();

    let presence = FilePresence::new(&cfg.clubroom.presence_file);
    if cfg.irc.channels.is_empty() {
        println!("  no channels configured");
    }
    for channel in &cfg.irc.channels {
        println!(
            "  {channel}: {} ({})",
            present_word(presence.is_present(channel)),
            presence.path_for(channel).display()
        );
    }
}

fn pick_channel(cfg: &Config, channel: Option<String>) -> anyhow::Result<String> {
    match channel.or_else(|| cfg.irc.channels.first().cloned()) {
        Some(c) => Ok(c),
        None => anyhow::bail!("no channel given and none configured"),
    }
}

fn present_word(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}
