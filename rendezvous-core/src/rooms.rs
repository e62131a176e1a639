use std::{collections::HashMap, fmt::Display, str::FromStr};

use chrono::Duration;
use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::Rng;
use thiserror::Error;

use crate::{is_expired, EngineError, EngineResult, Endpoint, Timestamp};

/// A five digit code that addresses a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCode(u32);

#[derive(Debug, Error)]
#[error("{0:?} is not a five digit room code")]
pub struct InvalidRoomCode(pub String);

impl RoomCode {
    pub const MIN: u32 = 10_000;
    pub const MAX: u32 = 99_999;

    pub fn new(value: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Picks a code uniformly from the whole code space
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.len() != 5 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidRoomCode(s.to_string()));
        }

        trimmed
            .parse()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidRoomCode(s.to_string()))
    }
}

/// A game session hosted by a player, joinable by code until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    pub host_username: String,
    pub host_endpoint: Endpoint,
    /// Opaque tag describing the game, e.g. "chess"
    pub game_type: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub host_username: String,
    pub host_endpoint: Endpoint,
    pub game_type: String,
}

/// Tracks live rooms by code.
///
/// Joining never consumes a room. A room can be looked up any number of
/// times until its ttl runs out, so a guest can retry and others can watch.
#[derive(Debug)]
pub struct RoomRegistry {
    ttl: Duration,
    max_attempts: usize,
    rooms: Mutex<HashMap<RoomCode, Room>>,
}

impl RoomRegistry {
    pub fn new(ttl: Duration, max_attempts: usize) -> Self {
        Self {
            ttl,
            max_attempts,
            rooms: Default::default(),
        }
    }

    /// Creates a room under a code that no live room is using
    pub fn create_room(&self, new_room: NewRoom, now: Timestamp) -> EngineResult<Room> {
        let mut rooms = self.rooms.lock();
        sweep_rooms(&mut rooms, now, self.ttl);

        let code = free_code(&rooms, self.max_attempts, &mut rand::thread_rng())?;
        let room = Room {
            code,
            host_username: new_room.host_username,
            host_endpoint: new_room.host_endpoint,
            game_type: new_room.game_type,
            created_at: now,
        };

        let previous = rooms.insert(code, room.clone());
        assert!(previous.is_none(), "room code {code} was handed out twice");

        info!(
            "Room {} ({}) created by {} at {}",
            code, room.game_type, room.host_username, room.host_endpoint
        );

        Ok(room)
    }

    /// Looks up a live room without changing it
    pub fn join_room(&self, code: RoomCode, now: Timestamp) -> EngineResult<Room> {
        let mut rooms = self.rooms.lock();
        sweep_rooms(&mut rooms, now, self.ttl);

        rooms
            .get(&code)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                resource: "room",
                identifier: code.to_string(),
            })
    }

    pub fn sweep(&self, now: Timestamp) -> usize {
        sweep_rooms(&mut self.rooms.lock(), now, self.ttl)
    }

    pub fn count(&self, now: Timestamp) -> usize {
        let mut rooms = self.rooms.lock();
        sweep_rooms(&mut rooms, now, self.ttl);

        rooms.len()
    }
}

fn free_code<R: Rng + ?Sized>(
    rooms: &HashMap<RoomCode, Room>,
    attempts: usize,
    rng: &mut R,
) -> EngineResult<RoomCode> {
    for _ in 0..attempts {
        let candidate = RoomCode::random(rng);

        if !rooms.contains_key(&candidate) {
            return Ok(candidate);
        }
    }

    warn!(
        "Could not find a free room code after {} attempts, {} rooms are live",
        attempts,
        rooms.len()
    );

    Err(EngineError::CapacityExhausted { attempts })
}

fn sweep_rooms(rooms: &mut HashMap<RoomCode, Room>, now: Timestamp, ttl: Duration) -> usize {
    let before = rooms.len();
    rooms.retain(|_, room| !is_expired(room.created_at, now, ttl));

    let removed = before - rooms.len();
    if removed > 0 {
        debug!("{} room(s) expired", removed);
    }

    removed
}
