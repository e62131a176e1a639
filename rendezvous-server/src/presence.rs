use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json,
};
use rendezvous_core::{Endpoint, Engine};

use crate::{
    address::ObservedAddr,
    schemas::{HeartbeatSchema, ValidatedJson},
    serialized::{OnlineUser, StatusReply, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/heartbeat",
    tag = "presence",
    request_body = HeartbeatSchema,
    responses(
        (status = 200, description = "The user is marked online", body = StatusReply)
    )
)]
pub(crate) async fn heartbeat(
    State(engine): State<Arc<Engine>>,
    observed: ObservedAddr,
    ValidatedJson(body): ValidatedJson<HeartbeatSchema>,
) -> Json<StatusReply> {
    let ip = observed.resolve(body.ip);
    engine.heartbeat(&body.username, Endpoint::new(ip, body.p2p_port));

    Json(StatusReply::new("ok"))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "presence",
    responses(
        (status = 200, description = "Everyone currently online", body = Vec<OnlineUser>)
    )
)]
pub(crate) async fn list_users(State(engine): State<Arc<Engine>>) -> Json<Vec<OnlineUser>> {
    let users: Vec<OnlineUser> = engine.list_online().to_serialized();

    Json(users)
}

pub fn router() -> Router {
    Router::new()
        .route("/heartbeat", post(heartbeat))
        .route("/users", get(list_users))
}
