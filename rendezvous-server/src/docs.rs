use axum::Json;
use utoipa::OpenApi;

use crate::{errors::ErrorBody, schemas::*, serialized::*};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::health,
        crate::presence::heartbeat,
        crate::presence::list_users,
        crate::rooms::create_room,
        crate::rooms::join_room,
        crate::invites::send_invite,
        crate::invites::check_invite,
        crate::matchmaking::register,
        crate::matchmaking::status,
        crate::matchmaking::unregister,
    ),
    components(schemas(
        HeartbeatSchema,
        CreateRoomSchema,
        JoinRoomSchema,
        SendInviteSchema,
        RegisterMatchSchema,
        UnregisterMatchSchema,
        StatusReply,
        Health,
        OnlineUser,
        CreatedRoom,
        FoundRoom,
        InviteCheck,
        MatchTicket,
        MatchState,
        ErrorBody,
    )),
    info(
        title = "rendezvous",
        description = "Lets two game clients find each other's address and connect directly"
    )
)]
pub struct ApiDoc;

pub(crate) async fn docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
