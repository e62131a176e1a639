use std::collections::HashMap;

use chrono::Duration;
use log::{debug, info};
use parking_lot::Mutex;

use crate::{RoomCode, Timestamp};

/// A challenge waiting to be picked up by its recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    /// Who sent the challenge
    pub from: String,
    pub room_code: RoomCode,
    pub game_type: String,
    pub sent_at: Timestamp,
}

impl Invite {
    /// An invite can only be picked up while it is younger than the ttl
    pub fn is_fresh(&self, now: Timestamp, ttl: Duration) -> bool {
        now - self.sent_at < ttl
    }
}

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub challenger: String,
    pub target: String,
    pub room_code: RoomCode,
    pub game_type: String,
}

/// Holds at most one pending invite per recipient.
///
/// Reading is destructive: an invite is handed out once and then it is gone.
#[derive(Debug)]
pub struct InviteMailbox {
    ttl: Duration,
    pending: Mutex<HashMap<String, Invite>>,
}

impl InviteMailbox {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Default::default(),
        }
    }

    /// Leaves an invite for the target, replacing any unread one
    pub fn deliver(&self, new_invite: NewInvite, now: Timestamp) {
        let mut pending = self.pending.lock();
        sweep_pending(&mut pending, now, self.ttl);

        info!(
            "{} challenged {} to {} in room {}",
            new_invite.challenger, new_invite.target, new_invite.game_type, new_invite.room_code
        );

        let replaced = pending.insert(
            new_invite.target,
            Invite {
                from: new_invite.challenger,
                room_code: new_invite.room_code,
                game_type: new_invite.game_type,
                sent_at: now,
            },
        );

        if let Some(replaced) = replaced {
            debug!("Unread invite from {} was replaced", replaced.from);
        }
    }

    /// Removes and returns the pending invite for the user, if it is still fresh.
    /// A stale invite is removed all the same.
    pub fn take(&self, username: &str, now: Timestamp) -> Option<Invite> {
        let invite = self.pending.lock().remove(username)?;

        if !invite.is_fresh(now, self.ttl) {
            debug!("Invite from {} to {} expired unread", invite.from, username);
            return None;
        }

        Some(invite)
    }

    pub fn sweep(&self, now: Timestamp) -> usize {
        sweep_pending(&mut self.pending.lock(), now, self.ttl)
    }

    pub fn count(&self, now: Timestamp) -> usize {
        let mut pending = self.pending.lock();
        sweep_pending(&mut pending, now, self.ttl);

        pending.len()
    }
}

fn sweep_pending(pending: &mut HashMap<String, Invite>, now: Timestamp, ttl: Duration) -> usize {
    let before = pending.len();
    pending.retain(|_, invite| invite.is_fresh(now, ttl));

    before - pending.len()
}
