use std::sync::Arc;

use colored::Colorize;
use log::{error, info};
use rendezvous_core::{Config, Engine};
use rendezvous_server::{ConfigError, ServerConfig};
use thiserror::Error;

mod logging;

#[derive(Debug, Error)]
enum RendezvousError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Server stopped: {0}")]
    Io(#[from] std::io::Error),
}

impl RendezvousError {
    fn hint(&self) -> String {
        match self {
            RendezvousError::Config(_) => {
                "Check the RENDEZVOUS_* and PORT environment variables and try again.".to_string()
            }
            RendezvousError::Io(_) => {
                "Make sure the port is free and the host address belongs to this machine."
                    .to_string()
            }
        }
    }
}

async fn run() -> Result<(), RendezvousError> {
    let config = ServerConfig::from_env()?;
    let engine = Arc::new(Engine::new(Config::default()));

    info!("Starting rendezvous server on {}", config.address());
    rendezvous_server::run_server(config, engine).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = logging::init_logger() {
        eprintln!("Could not initialize logging: {error}");
    }

    if let Err(error) = run().await {
        error!(
            "{} Read the error below to troubleshoot the issue.",
            "Rendezvous failed!".bold().red()
        );
        error!("{}", error);
        error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());

        std::process::exit(1);
    }
}
