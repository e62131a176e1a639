use std::{
    collections::{HashMap, VecDeque},
    fmt::Display,
};

use chrono::Duration;
use log::{debug, info};
use parking_lot::Mutex;

use crate::{is_expired, util::random_string, EngineError, EngineResult, Timestamp};

/// An opaque token handed to a player when they enter matchmaking
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    const LENGTH: usize = 32;

    pub fn generate() -> Self {
        Self(random_string(Self::LENGTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub username: String,
    /// The port the player listens on for the direct connection, if they host one
    pub p2p_port: Option<u16>,
    pub ip: String,
}

/// Who a player was paired with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPeer {
    pub username: String,
    pub ip: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Waiting,
    Matched(MatchPeer),
}

#[derive(Debug)]
struct QueueEntry {
    session_id: SessionId,
    username: String,
    ip: String,
    port: Option<u16>,
    enqueued_at: Timestamp,
}

#[derive(Debug)]
struct MatchRecord {
    status: MatchStatus,
    /// When the record last changed state
    updated_at: Timestamp,
}

#[derive(Debug, Default)]
struct QueueState {
    waiting: VecDeque<QueueEntry>,
    records: HashMap<SessionId, MatchRecord>,
}

/// Pairs anonymous players first come, first served.
///
/// Every session moves from waiting to matched at most once. Unlike invites,
/// reading a match does not consume it: both players need to see it.
#[derive(Debug)]
pub struct MatchQueue {
    entry_ttl: Duration,
    matched_ttl: Duration,
    state: Mutex<QueueState>,
}

impl MatchQueue {
    pub fn new(entry_ttl: Duration, matched_ttl: Duration) -> Self {
        Self {
            entry_ttl,
            matched_ttl,
            state: Default::default(),
        }
    }

    /// Enters a player into matchmaking. They are paired with whoever has waited
    /// the longest, or queued if nobody is waiting. Either way the outcome is
    /// found by polling [MatchQueue::status] with the returned session.
    pub fn register(&self, request: MatchRequest, now: Timestamp) -> SessionId {
        let session_id = SessionId::generate();

        let mut state = self.state.lock();
        state.sweep(now, self.entry_ttl, self.matched_ttl);

        // Re-registering replaces the previous ticket, so nobody is paired with themselves
        let withdrawn = state.withdraw(&request.username);
        if withdrawn > 0 {
            debug!("{} re-entered matchmaking", request.username);
        }

        debug_assert!(!state.records.contains_key(&session_id));

        match state.waiting.pop_front() {
            Some(opponent) => {
                info!(
                    "Matched {} with {} (waited {}s)",
                    request.username,
                    opponent.username,
                    (now - opponent.enqueued_at).num_seconds()
                );

                state.records.insert(
                    session_id.clone(),
                    MatchRecord {
                        status: MatchStatus::Matched(MatchPeer {
                            username: opponent.username.clone(),
                            ip: opponent.ip.clone(),
                            port: opponent.port,
                        }),
                        updated_at: now,
                    },
                );

                state.records.insert(
                    opponent.session_id,
                    MatchRecord {
                        status: MatchStatus::Matched(MatchPeer {
                            username: request.username,
                            ip: request.ip,
                            port: request.p2p_port,
                        }),
                        updated_at: now,
                    },
                );
            }
            None => {
                debug!("{} is waiting for an opponent", request.username);

                state.records.insert(
                    session_id.clone(),
                    MatchRecord {
                        status: MatchStatus::Waiting,
                        updated_at: now,
                    },
                );

                state.waiting.push_back(QueueEntry {
                    session_id: session_id.clone(),
                    username: request.username,
                    ip: request.ip,
                    port: request.p2p_port,
                    enqueued_at: now,
                });
            }
        }

        session_id
    }

    /// Returns where the session stands. Expired or unknown sessions are not found.
    pub fn status(&self, session_id: &SessionId, now: Timestamp) -> EngineResult<MatchStatus> {
        let mut state = self.state.lock();
        state.sweep(now, self.entry_ttl, self.matched_ttl);

        state
            .records
            .get(session_id)
            .map(|record| record.status.clone())
            .ok_or_else(|| EngineError::NotFound {
                resource: "match session",
                identifier: session_id.to_string(),
            })
    }

    /// Takes the user out of the queue. Sessions that were already matched are left alone.
    pub fn unregister(&self, username: &str, now: Timestamp) {
        let mut state = self.state.lock();
        state.sweep(now, self.entry_ttl, self.matched_ttl);

        if state.withdraw(username) > 0 {
            info!("{} left matchmaking", username);
        }
    }

    pub fn sweep(&self, now: Timestamp) -> usize {
        self.state
            .lock()
            .sweep(now, self.entry_ttl, self.matched_ttl)
    }

    /// How many players are waiting for an opponent
    pub fn waiting_count(&self, now: Timestamp) -> usize {
        let mut state = self.state.lock();
        state.sweep(now, self.entry_ttl, self.matched_ttl);

        state.waiting.len()
    }
}

impl QueueState {
    /// Evicts waiting players past the entry ttl along with their records,
    /// and forgets pairings past the matched ttl. Returns how many players
    /// were evicted plus how many pairings were forgotten.
    fn sweep(&mut self, now: Timestamp, entry_ttl: Duration, matched_ttl: Duration) -> usize {
        let records = &mut self.records;
        let waiting_before = self.waiting.len();

        self.waiting.retain(|entry| {
            let stale = is_expired(entry.enqueued_at, now, entry_ttl);

            if stale {
                debug!("{} gave up waiting for an opponent", entry.username);
                records.remove(&entry.session_id);
            }

            !stale
        });

        let records_before = records.len();
        records.retain(|_, record| match record.status {
            MatchStatus::Waiting => true,
            MatchStatus::Matched(_) => !is_expired(record.updated_at, now, matched_ttl),
        });

        (waiting_before - self.waiting.len()) + (records_before - self.records.len())
    }

    /// Removes every waiting entry of the user and the records behind them
    fn withdraw(&mut self, username: &str) -> usize {
        let records = &mut self.records;
        let before = self.waiting.len();

        self.waiting.retain(|entry| {
            let matches = entry.username == username;

            if matches {
                records.remove(&entry.session_id);
            }

            !matches
        });

        before - self.waiting.len()
    }
}
