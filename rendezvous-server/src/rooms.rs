use std::sync::Arc;

use axum::{extract::State, routing::post, Json};
use rendezvous_core::{Endpoint, Engine, NewRoom, RoomCode};

use crate::{
    address::ObservedAddr,
    errors::{ServerError, ServerResult},
    schemas::{CreateRoomSchema, JoinRoomSchema, ValidatedJson},
    serialized::{CreatedRoom, FoundRoom, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/create-room",
    tag = "rooms",
    request_body = CreateRoomSchema,
    responses(
        (status = 200, description = "The room was created", body = CreatedRoom),
        (status = 503, description = "No room code is free", body = ErrorBody)
    )
)]
pub(crate) async fn create_room(
    State(engine): State<Arc<Engine>>,
    observed: ObservedAddr,
    ValidatedJson(body): ValidatedJson<CreateRoomSchema>,
) -> ServerResult<Json<CreatedRoom>> {
    let ip = observed.resolve(body.ip);

    let code = engine.create_room(NewRoom {
        host_username: body.username,
        host_endpoint: Endpoint::new(ip, body.p2p_port),
        game_type: body.game_type.unwrap_or_default(),
    })?;

    Ok(Json(code.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/join-room",
    tag = "rooms",
    request_body = JoinRoomSchema,
    responses(
        (status = 200, description = "The host to connect to", body = FoundRoom),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub(crate) async fn join_room(
    State(engine): State<Arc<Engine>>,
    ValidatedJson(body): ValidatedJson<JoinRoomSchema>,
) -> ServerResult<Json<FoundRoom>> {
    // A code that can't exist is just a room that isn't there
    let code: RoomCode = body.room_id.parse().map_err(|_| ServerError::NotFound {
        resource: "room",
        identifier: body.room_id.clone(),
    })?;

    let room = engine.join_room(code)?;

    Ok(Json(room.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/create-room", post(create_room))
        .route("/join-room", post(join_room))
}
