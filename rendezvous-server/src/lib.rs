//! HTTP transport for the rendezvous engine

mod address;
mod config;
mod context;
mod docs;
mod errors;
mod health;
mod invites;
mod matchmaking;
mod presence;
mod relay;
mod rooms;
mod schemas;
mod serialized;
mod sweeper;

use std::{net::SocketAddr, sync::Arc};

use axum::routing::get;
use log::info;
use rendezvous_core::Engine;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use config::*;
pub use context::ServerContext;
pub use docs::ApiDoc;
pub use errors::{ServerError, ServerResult};
pub use relay::Relay;
pub use sweeper::spawn_sweeper;

pub type Router = axum::Router<ServerContext>;

/// Builds the full application with all routes attached
pub fn router(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::health))
        .merge(presence::router())
        .merge(rooms::router())
        .merge(invites::router())
        .merge(matchmaking::router())
        .route("/relay", get(relay::relay))
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Serves the application on an already bound listener
pub async fn serve(listener: TcpListener, context: ServerContext) -> std::io::Result<()> {
    axum::serve(
        listener,
        router(context).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Starts the rendezvous server
pub async fn run_server(config: ServerConfig, engine: Arc<Engine>) -> std::io::Result<()> {
    if let Some(every) = config.sweep_interval {
        spawn_sweeper(engine.clone(), every);
    }

    let listener = TcpListener::bind(config.address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, ServerContext::new(engine)).await
}
