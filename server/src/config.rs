//! Server configuration, read from environment variables.
//!
//! Every setting has a default; a value that is present but unparsable is
//! reported and replaced by the default.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use tracing::warn;

pub const DEFAULT_BUSES_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_WEBCLIENTS_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_BROADCAST_INTERVAL_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listener for publisher (emulator) connections.
    pub buses_addr: SocketAddr,
    /// Listener for web client connections.
    pub webclients_addr: SocketAddr,
    /// Delay between two snapshots sent to the same web client.
    pub broadcast_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            buses_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            webclients_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            broadcast_interval: Duration::from_millis(DEFAULT_BROADCAST_INTERVAL_MS),
        }
    }
}

impl ServerConfig {
    /// Reads `SERVER_BUSES_ADDR`, `SERVER_WEBCLIENTS_ADDR` and
    /// `SERVER_BROADCAST_INTERVAL_MS`.
    pub fn from_env() -> ServerConfig {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            buses_addr: parse_or(&lookup, "SERVER_BUSES_ADDR", defaults.buses_addr),
            webclients_addr: parse_or(&lookup, "SERVER_WEBCLIENTS_ADDR", defaults.webclients_addr),
            broadcast_interval: Duration::from_millis(parse_or(
                &lookup,
                "SERVER_BROADCAST_INTERVAL_MS",
                DEFAULT_BROADCAST_INTERVAL_MS,
            )),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.is_empty() => raw.parse().unwrap_or_else(|_| {
            warn!(setting = name, value = %raw, %default, "unparsable setting, using default");
            default
        }),
        _ => default,
    }
}
