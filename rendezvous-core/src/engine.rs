use std::sync::Arc;

use log::debug;

use crate::{
    Clock, Config, EngineError, EngineResult, Endpoint, Invite, InviteMailbox, MatchQueue,
    MatchRequest, MatchStatus, NewInvite, NewRoom, PresenceRegistry, Room, RoomCode, RoomRegistry,
    SessionId, SystemClock,
};

/// The rendezvous engine, composing presence, rooms, invites and matchmaking.
///
/// Each container guards its own state. No operation holds two containers'
/// locks at once: the presence check before an invite completes before the
/// mailbox is touched.
pub struct Engine {
    clock: Arc<dyn Clock>,

    presence: PresenceRegistry,
    rooms: RoomRegistry,
    invites: InviteMailbox,
    matchmaking: MatchQueue,
}

/// Sizes of the containers after a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub online: usize,
    pub rooms: usize,
    pub waiting: usize,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            presence: PresenceRegistry::new(config.presence_ttl),
            rooms: RoomRegistry::new(config.room_ttl, config.room_code_attempts),
            invites: InviteMailbox::new(config.invite_ttl),
            matchmaking: MatchQueue::new(config.queue_entry_ttl, config.matched_record_ttl),
            clock,
        }
    }

    /// Marks the user as online at the given endpoint
    pub fn heartbeat(&self, username: &str, endpoint: Endpoint) {
        self.presence.heartbeat(username, endpoint, self.clock.now());
    }

    pub fn list_online(&self) -> Vec<String> {
        self.presence.list_online(self.clock.now())
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.presence.is_online(username, self.clock.now())
    }

    /// Creates a room hosted by the given player, returning its code
    pub fn create_room(&self, new_room: NewRoom) -> EngineResult<RoomCode> {
        let now = self.clock.now();
        self.presence.sweep(now);

        self.rooms.create_room(new_room, now).map(|room| room.code)
    }

    pub fn join_room(&self, code: RoomCode) -> EngineResult<Room> {
        let now = self.clock.now();
        self.presence.sweep(now);

        self.rooms.join_room(code, now)
    }

    /// Leaves an invite for an online player
    pub fn send_invite(&self, new_invite: NewInvite) -> EngineResult<()> {
        let now = self.clock.now();

        if !self.presence.is_online(&new_invite.target, now) {
            return Err(EngineError::TargetOffline {
                username: new_invite.target,
            });
        }

        self.invites.deliver(new_invite, now);
        Ok(())
    }

    /// Hands out the pending invite for the user, at most once
    pub fn check_invite(&self, username: &str) -> Option<Invite> {
        self.invites.take(username, self.clock.now())
    }

    pub fn register_for_match(&self, request: MatchRequest) -> SessionId {
        self.matchmaking.register(request, self.clock.now())
    }

    pub fn match_status(&self, session_id: &SessionId) -> EngineResult<MatchStatus> {
        self.matchmaking.status(session_id, self.clock.now())
    }

    pub fn unregister_from_match(&self, username: &str) {
        self.matchmaking.unregister(username, self.clock.now())
    }

    /// Runs every container's expiry once, returning how many entries were dropped
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();

        let removed = self.presence.sweep(now)
            + self.rooms.sweep(now)
            + self.invites.sweep(now)
            + self.matchmaking.sweep(now);

        if removed > 0 {
            debug!("Swept {} stale entries", removed);
        }

        removed
    }

    pub fn stats(&self) -> EngineStats {
        let now = self.clock.now();

        EngineStats {
            online: self.presence.count(now),
            rooms: self.rooms.count(now),
            waiting: self.matchmaking.waiting_count(now),
        }
    }
}
