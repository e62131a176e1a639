use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json,
};
use rendezvous_core::{Engine, InvalidRoomCode, NewInvite, RoomCode};

use crate::{
    errors::{ServerError, ServerResult},
    schemas::{SendInviteSchema, ValidatedJson},
    serialized::{InviteCheck, StatusReply, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/send-invite",
    tag = "invites",
    request_body = SendInviteSchema,
    responses(
        (status = 200, description = "The invite is waiting for its recipient", body = StatusReply),
        (status = 404, description = "The recipient is not online", body = ErrorBody)
    )
)]
pub(crate) async fn send_invite(
    State(engine): State<Arc<Engine>>,
    ValidatedJson(body): ValidatedJson<SendInviteSchema>,
) -> ServerResult<Json<StatusReply>> {
    let room_code: RoomCode = body
        .room_id
        .parse()
        .map_err(|e: InvalidRoomCode| ServerError::BadRequest(e.to_string()))?;

    engine.send_invite(NewInvite {
        challenger: body.challenger,
        target: body.target,
        room_code,
        game_type: body.game_type.unwrap_or_default(),
    })?;

    Ok(Json(StatusReply::new("sent")))
}

#[utoipa::path(
    get,
    path = "/check-invite/{username}",
    tag = "invites",
    params(
        ("username" = String, Path, description = "The recipient to check for")
    ),
    responses(
        (status = 200, description = "The pending invite, handed out only once", body = InviteCheck)
    )
)]
pub(crate) async fn check_invite(
    State(engine): State<Arc<Engine>>,
    Path(username): Path<String>,
) -> Json<InviteCheck> {
    Json(engine.check_invite(&username).to_serialized())
}

pub fn router() -> Router {
    Router::new()
        .route("/send-invite", post(send_invite))
        .route("/check-invite/:username", get(check_invite))
}
