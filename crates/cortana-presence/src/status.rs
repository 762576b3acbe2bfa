//! Clubroom status record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical clubroom state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubStatus {
    Open,
    #[default]
    Closed,
    Reserved,
}

impl ClubStatus {
    /// Word used in the topic announcement.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reserved => "reserved",
        }
    }

    /// Parse a status word as written in a topic. Accepts the Finnish
    /// spellings too, since people edit topics by hand.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "open" | "auki" => Some(Self::Open),
            "closed" | "kiinni" => Some(Self::Closed),
            "reserved" | "varattu" => Some(Self::Reserved),
            _ => None,
        }
    }
}

impl fmt::Display for ClubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the engine currently believes about one channel's clubroom.
///
/// Presence is not stored: it is always derived from `status`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: ClubStatus,
    /// Free-text note appended to the announcement. Possibly empty.
    pub extra: String,
}

impl StatusRecord {
    pub fn new(status: ClubStatus, extra: impl Into<String>) -> Self {
        Self {
            status,
            extra: extra.into(),
        }
    }

    /// Whether somebody is in the clubroom: OPEN and RESERVED are present.
    pub fn presence(&self) -> bool {
        self.status != ClubStatus::Closed
    }
}
