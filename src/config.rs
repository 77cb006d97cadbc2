use std::{fs, net::SocketAddr};

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use serde::Deserialize;

const DOCKER_SOCKET_DEFAULT: &str = "/var/run/docker.sock";
const LISTEN_DEFAULT: &str = "0.0.0.0:8000";
const TIMEOUT_DEFAULT: u64 = 60;
const EVENT_RETRY_INTERVAL_DEFAULT: u64 = 5;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "docker_socket_default")]
    pub docker_socket: String,

    #[serde(default = "listen_default")]
    pub listen: SocketAddr,

    #[serde(default = "timeout_default")]
    pub timeout: u64,

    #[serde(default = "event_retry_interval_default")]
    pub event_retry_interval: u64,
}

impl Config {
    pub fn new(config_path: &str) -> Result<Self> {
        info!("Using configuration file {config_path}. ");

        let config = fs::read_to_string(config_path)?;
        Self::parse(&config)
    }

    pub fn parse(config: &str) -> Result<Self> {
        let config = config.trim();
        let config: Self = if config.is_empty() {
            serde_yaml::from_str("{}")?
        } else {
            serde_yaml::from_str(config)?
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            error!("config.timeout must be at least one second. ");
            return Err(anyhow!("invalid configuration"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_socket: docker_socket_default(),
            listen: listen_default(),
            timeout: timeout_default(),
            event_retry_interval: event_retry_interval_default(),
        }
    }
}

fn docker_socket_default() -> String {
    debug!("Defaulting config.docker_socket to {DOCKER_SOCKET_DEFAULT}. ");
    String::from(DOCKER_SOCKET_DEFAULT)
}

fn listen_default() -> SocketAddr {
    debug!("Defaulting config.listen to {LISTEN_DEFAULT}. ");
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn timeout_default() -> u64 {
    debug!("Defaulting config.timeout to {TIMEOUT_DEFAULT}. ");
    TIMEOUT_DEFAULT
}

fn event_retry_interval_default() -> u64 {
    debug!("Defaulting config.event_retry_interval to {EVENT_RETRY_INTERVAL_DEFAULT}. ");
    EVENT_RETRY_INTERVAL_DEFAULT
}
