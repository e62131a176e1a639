use chrono::Duration;
use indexmap::IndexMap;
use log::debug;
use parking_lot::Mutex;

use crate::{is_expired, Endpoint, Timestamp};

/// The last known whereabouts of an online user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub username: String,
    pub endpoint: Endpoint,
    pub last_seen: Timestamp,
}

/// Tracks who is online, keyed by username.
///
/// Entries are kept in the order users first came online, and are dropped
/// lazily once they have not sent a heartbeat for longer than the ttl.
#[derive(Debug)]
pub struct PresenceRegistry {
    ttl: Duration,
    entries: Mutex<IndexMap<String, PresenceEntry>>,
}

impl PresenceRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Default::default(),
        }
    }

    /// Marks the user as online at the given endpoint, replacing whatever was known before
    pub fn heartbeat(&self, username: &str, endpoint: Endpoint, now: Timestamp) {
        let mut entries = self.entries.lock();
        sweep_entries(&mut entries, now, self.ttl);

        entries.insert(
            username.to_string(),
            PresenceEntry {
                username: username.to_string(),
                endpoint,
                last_seen: now,
            },
        );
    }

    /// Returns the usernames of everyone currently online
    pub fn list_online(&self, now: Timestamp) -> Vec<String> {
        let mut entries = self.entries.lock();
        sweep_entries(&mut entries, now, self.ttl);

        entries.keys().cloned().collect()
    }

    pub fn is_online(&self, username: &str, now: Timestamp) -> bool {
        self.entry(username, now).is_some()
    }

    pub fn entry(&self, username: &str, now: Timestamp) -> Option<PresenceEntry> {
        let mut entries = self.entries.lock();
        sweep_entries(&mut entries, now, self.ttl);

        entries.get(username).cloned()
    }

    /// Drops stale entries, returning how many were removed
    pub fn sweep(&self, now: Timestamp) -> usize {
        sweep_entries(&mut self.entries.lock(), now, self.ttl)
    }

    pub fn count(&self, now: Timestamp) -> usize {
        let mut entries = self.entries.lock();
        sweep_entries(&mut entries, now, self.ttl);

        entries.len()
    }
}

fn sweep_entries(
    entries: &mut IndexMap<String, PresenceEntry>,
    now: Timestamp,
    ttl: Duration,
) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !is_expired(entry.last_seen, now, ttl));

    let removed = before - entries.len();
    if removed > 0 {
        debug!("{} user(s) went offline", removed);
    }

    removed
}
