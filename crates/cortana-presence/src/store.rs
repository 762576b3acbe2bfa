//! In-memory channel → status record map.

use crate::status::StatusRecord;
use cortana_core::error::CortanaError;
use std::collections::HashMap;

/// Per-channel status records, keyed by lowercased channel name.
///
/// Records are only created by [`StatusStore::register`]; every other
/// accessor fails with [`CortanaError::UntrackedChannel`] for unknown
/// channels instead of fabricating a default.
#[derive(Debug, Default, Clone)]
pub struct StatusStore {
    records: HashMap<String, StatusRecord>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `channel` with a CLOSED record. Returns `false` when it
    /// was already tracked (the existing record is kept).
    pub fn register(&mut self, channel: &str) -> bool {
        let key = channel_key(channel);
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key, StatusRecord::default());
        true
    }

    pub fn is_tracked(&self, channel: &str) -> bool {
        self.records.contains_key(&channel_key(channel))
    }

    pub fn get(&self, channel: &str) -> Result<&StatusRecord, CortanaError> {
        self.records
            .get(&channel_key(channel))
            .ok_or_else(|| CortanaError::UntrackedChannel(channel.to_string()))
    }

    /// Replace the whole record of a tracked channel.
    pub fn replace(&mut self, channel: &str, record: StatusRecord) -> Result<(), CortanaError> {
        match self.records.get_mut(&channel_key(channel)) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(CortanaError::UntrackedChannel(channel.to_string())),
        }
    }

    /// Owned copy of every (channel, record) pair, sorted by channel.
    pub fn snapshot(&self) -> Vec<(String, StatusRecord)> {
        let mut pairs: Vec<_> = self
            .records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Tracked channel names, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<_> = self.records.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// IRC channel names are case-insensitive.
fn channel_key(channel: &str) -> String {
    channel.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ClubStatus;

    #[test]
    fn test_register_creates_closed_record() {
        let mut store = StatusStore::new();
        assert!(store.register("#polygame"));
        let rec = store.get("#polygame").unwrap();
        assert_eq!(rec, &StatusRecord::default());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = StatusStore::new();
        store.register("#polygame");
        store
            .replace("#polygame", StatusRecord::new(ClubStatus::Open, "hi"))
            .unwrap();
        assert!(!store.register("#PolyGame"));
        assert_eq!(store.get("#polygame").unwrap().status, ClubStatus::Open);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_untracked_channel_is_an_error() {
        let mut store = StatusStore::new();
        assert!(matches!(
            store.get("#nowhere"),
            Err(CortanaError::UntrackedChannel(_))
        ));
        assert!(matches!(
            store.replace("#nowhere", StatusRecord::default()),
            Err(CortanaError::UntrackedChannel(_))
        ));
        assert!(store.is_empty(), "no record may be fabricated");
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let mut store = StatusStore::new();
        store.register("#b");
        store.register("#a");
        let snap = store.snapshot();
        store
            .replace("#a", StatusRecord::new(ClubStatus::Reserved, ""))
            .unwrap();
        assert_eq!(snap[0].0, "#a");
        assert_eq!(snap[0].1.status, ClubStatus::Closed);
        assert_eq!(store.channels(), vec!["#a", "#b"]);
    }
}
