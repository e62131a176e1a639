use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rendezvous_core::EngineError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    #[error("{username} is not online")]
    TargetOffline { username: String },
    #[error("No room code is free right now, try again later")]
    CapacityExhausted,
    #[error("{0}")]
    BadRequest(String),
}

/// The body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    detail: String,
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::TargetOffline { .. } => StatusCode::NOT_FOUND,
            Self::CapacityExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            EngineError::TargetOffline { username } => Self::TargetOffline { username },
            EngineError::CapacityExhausted { .. } => Self::CapacityExhausted,
        }
    }
}

#[cfg(test)]
mod test {
    use axum::{http::StatusCode, response::IntoResponse};
    use rendezvous_core::EngineError;

    use super::ServerError;

    #[test]
    fn engine_errors_map_to_status_codes() {
        let cases = [
            (
                EngineError::NotFound {
                    resource: "room",
                    identifier: "12345".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::TargetOffline {
                    username: "bob".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::CapacityExhausted { attempts: 50 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            let response = ServerError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
