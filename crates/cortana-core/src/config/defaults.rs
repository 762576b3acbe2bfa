//! Default value functions used by serde for config deserialization.

pub fn default_data_dir() -> String {
    "~/.cortana".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_irc_server() -> String {
    "irc.libera.chat".to_string()
}

pub fn default_irc_port() -> u16 {
    6667
}

pub fn default_nick() -> String {
    "Cortana".to_string()
}

pub fn default_realname() -> String {
    "Clubroom status bot".to_string()
}

pub fn default_irc_channels() -> Vec<String> {
    vec!["#polygame".to_string()]
}

pub fn default_status_prefix() -> String {
    "JMT11CD: ".to_string()
}

pub fn default_topic_separator() -> String {
    "|".to_string()
}

pub fn default_presence_file() -> String {
    "/tmp/cortana.{channel}.presence".to_string()
}

pub fn default_poll_interval() -> u64 {
    5
}

pub fn default_command_cooldown() -> u64 {
    5
}

pub fn default_command_prefix() -> String {
    ".".to_string()
}

pub fn default_stale_note_start() -> String {
    "00:00".to_string()
}

pub fn default_stale_note_end() -> String {
    "24:00".to_string()
}
