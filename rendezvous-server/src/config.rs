use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where and how the server runs, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// How often stale state is swept in the background, if at all
    pub sweep_interval: Option<Duration>,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 10000;
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any source of variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("RENDEZVOUS_HOST") {
            Some(value) => parse("RENDEZVOUS_HOST", "an IP address", value)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        // Hosting platforms hand out the port through PORT
        let port = match lookup("RENDEZVOUS_PORT") {
            Some(value) => parse("RENDEZVOUS_PORT", "a port number", value)?,
            None => match lookup("PORT") {
                Some(value) => parse("PORT", "a port number", value)?,
                None => Self::DEFAULT_PORT,
            },
        };

        let sweep_secs: u64 = match lookup("RENDEZVOUS_SWEEP_INTERVAL_SECS") {
            Some(value) => parse(
                "RENDEZVOUS_SWEEP_INTERVAL_SECS",
                "a number of seconds",
                value,
            )?,
            None => Self::DEFAULT_SWEEP_INTERVAL_SECS,
        };

        Ok(Self {
            host,
            port,
            sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
        })
    }

    pub fn address(&self) -> SocketAddr {
        (self.host, self.port).into()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: Self::DEFAULT_PORT,
            sweep_interval: Some(Duration::from_secs(Self::DEFAULT_SWEEP_INTERVAL_SECS)),
        }
    }
}

fn parse<T: FromStr>(
    key: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value,
    })
}
