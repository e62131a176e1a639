use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json,
};
use rendezvous_core::{Engine, MatchRequest, SessionId};

use crate::{
    address::ObservedAddr,
    errors::ServerResult,
    schemas::{RegisterMatchSchema, UnregisterMatchSchema, ValidatedJson},
    serialized::{MatchState, MatchTicket, StatusReply, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/matchmaking/register",
    tag = "matchmaking",
    request_body = RegisterMatchSchema,
    responses(
        (status = 200, description = "A session to poll for the outcome", body = MatchTicket)
    )
)]
pub(crate) async fn register(
    State(engine): State<Arc<Engine>>,
    observed: ObservedAddr,
    ValidatedJson(body): ValidatedJson<RegisterMatchSchema>,
) -> Json<MatchTicket> {
    let session_id = engine.register_for_match(MatchRequest {
        username: body.username,
        p2p_port: body.p2p_port,
        ip: observed.resolve(body.ip),
    });

    Json(session_id.to_serialized())
}

#[utoipa::path(
    get,
    path = "/matchmaking/status/{session_id}",
    tag = "matchmaking",
    params(
        ("session_id" = String, Path, description = "The session returned on registration")
    ),
    responses(
        (status = 200, description = "Still waiting, or the peer to connect to", body = MatchState),
        (status = 404, description = "Unknown or expired session", body = ErrorBody)
    )
)]
pub(crate) async fn status(
    State(engine): State<Arc<Engine>>,
    Path(session_id): Path<String>,
) -> ServerResult<Json<MatchState>> {
    let status = engine.match_status(&SessionId::from(session_id))?;

    Ok(Json(status.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/matchmaking/unregister",
    tag = "matchmaking",
    request_body = UnregisterMatchSchema,
    responses(
        (status = 200, description = "The player is no longer waiting", body = StatusReply)
    )
)]
pub(crate) async fn unregister(
    State(engine): State<Arc<Engine>>,
    ValidatedJson(body): ValidatedJson<UnregisterMatchSchema>,
) -> Json<StatusReply> {
    engine.unregister_from_match(&body.username);

    Json(StatusReply::new("ok"))
}

pub fn router() -> Router {
    Router::new()
        .route("/matchmaking/register", post(register))
        .route("/matchmaking/status/:session_id", get(status))
        .route("/matchmaking/unregister", post(unregister))
}
