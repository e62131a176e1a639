use std::sync::Arc;

use axum::{extract::State, Json};
use rendezvous_core::Engine;

use crate::serialized::{Health, ToSerialized};

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "The server is up", body = Health)
    )
)]
pub(crate) async fn health(State(engine): State<Arc<Engine>>) -> Json<Health> {
    Json(engine.stats().to_serialized())
}
