//! Presence marker shared with the button/LED process.
//!
//! The marker is a plain file: it exists while somebody is in the clubroom.
//! Both this bot and the hardware process create and delete it without any
//! locking, so readers must accept that it can flip between a read and a
//! write. The next poll tick settles the difference.

use cortana_core::error::CortanaError;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// A per-channel boolean that lives outside the process.
pub trait PresenceSignal: Send + Sync {
    /// Whether the channel's marker says somebody is present.
    fn is_present(&self, channel: &str) -> bool;

    /// Make the marker say `present`.
    fn set(&self, channel: &str, present: bool) -> Result<(), CortanaError>;

    /// Flip the marker, the way the physical button does. Returns the new
    /// state.
    fn toggle(&self, channel: &str) -> Result<bool, CortanaError> {
        let present = !self.is_present(channel);
        self.set(channel, present)?;
        Ok(present)
    }
}

/// File-backed presence marker with a templated path.
#[derive(Debug, Clone)]
pub struct FilePresence {
    template: String,
}

impl FilePresence {
    /// `template` may contain `{channel}`, replaced by the channel name
    /// without its leading `#`/`&`.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Marker path for `channel`.
    pub fn path_for(&self, channel: &str) -> PathBuf {
        let name = channel
            .trim_start_matches(['#', '&'])
            .to_lowercase()
            .replace(['/', '\\'], "_");
        PathBuf::from(self.template.replace("{channel}", &name))
    }
}

impl PresenceSignal for FilePresence {
    fn is_present(&self, channel: &str) -> bool {
        self.path_for(channel).exists()
    }

    fn set(&self, channel: &str, present: bool) -> Result<(), CortanaError> {
        let path = self.path_for(channel);
        if present {
            if path.exists() {
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            info!("presence: {} created", path.display());
        } else {
            match std::fs::remove_file(&path) {
                Ok(()) => info!("presence: {} removed", path.display()),
                // The button got there first.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
