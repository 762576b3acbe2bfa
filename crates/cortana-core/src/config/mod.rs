mod channels;
mod clubroom;
mod defaults;


pub use channels::*;
pub use clubroom::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::CortanaError;
use defaults::*;

/// Environment variable that overrides the presence file template. Shared
/// with the button/LED process.
pub const PRESENCE_FILE_ENV: &str = "CORTANA_PRESENCE_FILE";

/// Top-level Cortana configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cortana: CortanaConfig,
    #[serde(default)]
    pub irc: IrcConfig,
    #[serde(default)]
    pub clubroom: ClubroomConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CortanaConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write a daily log file under `{data_dir}/logs/`.
    #[serde(default)]
    pub log_file: bool,
}

impl Default for CortanaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_file: false,
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. The presence file
/// template can be overridden with [`PRESENCE_FILE_ENV`].
pub fn load(path: &str) -> Result<Config, CortanaError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CortanaError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    };

    if let Ok(template) = std::env::var(PRESENCE_FILE_ENV) {
        if !template.is_empty() {
            config.clubroom.presence_file = template;
        }
    }

    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, CortanaError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CortanaError::Config(format!("failed to parse config: {}", e)))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), CortanaError> {
    if config.clubroom.topic_separator.is_empty() {
        return Err(CortanaError::Config(
            "clubroom.topic_separator must not be empty".into(),
        ));
    }
    if config.clubroom.poll_interval_secs == 0 {
        return Err(CortanaError::Config(
            "clubroom.poll_interval_secs must be at least 1".into(),
        ));
    }
    let start = &config.clubroom.stale_note_start;
    if !matches!(clock_minutes(start), Some(m) if m < 24 * 60) {
        return Err(CortanaError::Config(format!(
            "clubroom.stale_note_start must be zero-padded HH:MM, got {start:?}"
        )));
    }
    let end = &config.clubroom.stale_note_end;
    if clock_minutes(end).is_none() {
        return Err(CortanaError::Config(format!(
            "clubroom.stale_note_end must be zero-padded HH:MM or 24:00, got {end:?}"
        )));
    }
    if config.irc.nick.trim().is_empty() {
        return Err(CortanaError::Config("irc.nick must not be empty".into()));
    }
    Ok(())
}
