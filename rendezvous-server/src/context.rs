use std::sync::Arc;

use axum::extract::FromRef;
use rendezvous_core::Engine;

use crate::relay::Relay;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub engine: Arc<Engine>,
    pub relay: Arc<Relay>,
}

impl ServerContext {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            relay: Arc::new(Relay::new()),
        }
    }
}
