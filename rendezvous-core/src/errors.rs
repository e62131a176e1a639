use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A room code or match session is unknown, or has expired
    #[error("{resource}:{identifier} not found")]
    NotFound {
        /// The kind of resource that was looked up
        resource: &'static str,
        /// The identifier that was used
        identifier: String,
    },
    /// An invite was addressed to someone who is not online
    #[error("{username} is not online")]
    TargetOffline { username: String },
    /// Every generated room code collided with a live room
    #[error("No free room code found after {attempts} attempts")]
    CapacityExhausted { attempts: usize },
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
