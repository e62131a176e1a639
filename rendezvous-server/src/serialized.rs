//! Everything returned from endpoints is defined here,
//! along with how engine types turn into it

use rendezvous_core::{EngineStats, Invite, MatchStatus, Room, RoomCode, SessionId};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusReply {
    status: String,
}

impl StatusReply {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    status: String,
    /// Users currently online
    users: usize,
    /// Live rooms
    rooms: usize,
    /// Players waiting in matchmaking
    waiting: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnlineUser {
    username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedRoom {
    room_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoundRoom {
    status: String,
    host_ip: String,
    host_port: u16,
    host_username: String,
    game_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InviteCheck {
    /// Either "invite" or "none"
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchTicket {
    session_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchState {
    /// Either "waiting" or "matched"
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer_port: Option<u16>,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Health> for EngineStats {
    fn to_serialized(&self) -> Health {
        Health {
            status: "Server is running".to_string(),
            users: self.online,
            rooms: self.rooms,
            waiting: self.waiting,
        }
    }
}

impl ToSerialized<OnlineUser> for String {
    fn to_serialized(&self) -> OnlineUser {
        OnlineUser {
            username: self.clone(),
        }
    }
}

impl ToSerialized<CreatedRoom> for RoomCode {
    fn to_serialized(&self) -> CreatedRoom {
        CreatedRoom {
            room_id: self.to_string(),
        }
    }
}

impl ToSerialized<FoundRoom> for Room {
    fn to_serialized(&self) -> FoundRoom {
        FoundRoom {
            status: "found".to_string(),
            host_ip: self.host_endpoint.ip.clone(),
            host_port: self.host_endpoint.port,
            host_username: self.host_username.clone(),
            game_type: self.game_type.clone(),
        }
    }
}

impl ToSerialized<InviteCheck> for Option<Invite> {
    fn to_serialized(&self) -> InviteCheck {
        match self {
            Some(invite) => InviteCheck {
                status: "invite".to_string(),
                from: Some(invite.from.clone()),
                room_id: Some(invite.room_code.to_string()),
                game_type: Some(invite.game_type.clone()),
            },
            None => InviteCheck {
                status: "none".to_string(),
                from: None,
                room_id: None,
                game_type: None,
            },
        }
    }
}

impl ToSerialized<MatchTicket> for SessionId {
    fn to_serialized(&self) -> MatchTicket {
        MatchTicket {
            session_id: self.to_string(),
        }
    }
}

impl ToSerialized<MatchState> for MatchStatus {
    fn to_serialized(&self) -> MatchState {
        match self {
            MatchStatus::Waiting => MatchState {
                status: "waiting".to_string(),
                peer_username: None,
                peer_ip: None,
                peer_port: None,
            },
            MatchStatus::Matched(peer) => MatchState {
                status: "matched".to_string(),
                peer_username: Some(peer.username.clone()),
                peer_ip: Some(peer.ip.clone()),
                peer_port: peer.port,
            },
        }
    }
}
