//! Request bodies accepted by the endpoints, and the extractor that validates them

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ServerError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HeartbeatSchema {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub p2p_port: u16,
    /// Address to advertise instead of the one the request came from
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomSchema {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub p2p_port: u16,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub game_type: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinRoomSchema {
    #[validate(length(max = 16))]
    pub room_id: String,
    /// Sent by clients, not used for the lookup
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendInviteSchema {
    #[validate(length(min = 1, max = 64))]
    pub challenger: String,
    #[validate(length(min = 1, max = 64))]
    pub target: String,
    #[validate(length(equal = 5))]
    pub room_id: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub game_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterMatchSchema {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[serde(default)]
    pub p2p_port: Option<u16>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnregisterMatchSchema {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

/// Like [Json], but the body is also validated
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

        body.validate()
            .map_err(|errors| ServerError::BadRequest(format!("Request body is invalid: {errors}")))?;

        Ok(Self(body))
    }
}
