use serde::{Deserialize, Serialize};

use super::defaults::*;

/// What the `status`/`reporting` keyword does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKeywordPolicy {
    /// Treat it like `open`: flip to OPEN with the remainder as note.
    #[default]
    Open,
    /// Leave the state alone and answer with the current announcement.
    Report,
}

/// Clubroom status engine config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubroomConfig {
    /// Literal that starts the bot-owned topic segment.
    #[serde(default = "default_status_prefix")]
    pub status_prefix: String,
    #[serde(default = "default_topic_separator")]
    pub topic_separator: String,
    /// Presence marker path. `{channel}` is replaced by the channel name
    /// without its leading sigil.
    #[serde(default = "default_presence_file")]
    pub presence_file: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Minimum spacing between accepted commands per channel. 0 = no limit.
    #[serde(default = "default_command_cooldown")]
    pub command_cooldown_secs: u64,
    /// Required in front of direct commands (`.open`). Empty accepts bare
    /// keywords, which also catches chatter like "open source is great".
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default)]
    pub status_keyword: StatusKeywordPolicy,
    /// Start of the window (zero-padded "HH:MM") in which a button-driven close
    /// also clears the note.
    #[serde(default = "default_stale_note_start")]
    pub stale_note_start: String,
    /// End of that window (e.g. "06:00"). "24:00" = until midnight.
    #[serde(default = "default_stale_note_end")]
    pub stale_note_end: String,
}

impl Default for ClubroomConfig {
    fn default() -> Self {
        Self {
            status_prefix: default_status_prefix(),
            topic_separator: default_topic_separator(),
            presence_file: default_presence_file(),
            poll_interval_secs: default_poll_interval(),
            command_cooldown_secs: default_command_cooldown(),
            command_prefix: default_command_prefix(),
            status_keyword: StatusKeywordPolicy::default(),
            stale_note_start: default_stale_note_start(),
            stale_note_end: default_stale_note_end(),
        }
    }
}

/// Minutes since midnight for a zero-padded `"HH:MM"` clock value.
/// `"24:00"` is the end of the day (1440).
pub fn clock_minutes(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 || !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (h, m): (u32, u32) = (h.parse().ok()?, m.parse().ok()?);
    match (h, m) {
        (24, 0) => Some(24 * 60),
        (0..=23, 0..=59) => Some(h * 60 + m),
        _ => None,
    }
}
