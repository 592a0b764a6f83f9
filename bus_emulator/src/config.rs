use std::{path::PathBuf, str::FromStr, time::Duration};

use tracing::warn;

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080";
pub const DEFAULT_CONNECTIONS_COUNT: usize = 5;
pub const DEFAULT_BUSES_PER_ROUTE: usize = 20;
pub const DEFAULT_ROUTES_DIR: &str = "routes";
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 300;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Ingestion endpoint every sender connects to.
    pub server_url: String,
    /// Size of the outbound connection pool.
    pub connections_count: usize,
    pub buses_per_route: usize,
    pub routes_dir: PathBuf,
    /// Pause between two positions of the same bus.
    pub step_interval: Duration,
    /// Pause before a sender reconnects after a failure.
    pub retry_delay: Duration,
    /// Buffer between the buses and the sender pool. Zero is raised to one.
    pub channel_capacity: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            connections_count: DEFAULT_CONNECTIONS_COUNT,
            buses_per_route: DEFAULT_BUSES_PER_ROUTE,
            routes_dir: PathBuf::from(DEFAULT_ROUTES_DIR),
            step_interval: Duration::from_millis(DEFAULT_STEP_INTERVAL_MS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl EmulatorConfig {
    pub fn from_env() -> EmulatorConfig {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EmulatorConfig {
        let server_url = lookup("EMULATOR_SERVER_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned());
        let routes_dir = lookup("EMULATOR_ROUTES_DIR")
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_ROUTES_DIR), PathBuf::from);

        EmulatorConfig {
            server_url,
            connections_count: parse_or(&lookup, "EMULATOR_CONNECTIONS_COUNT", DEFAULT_CONNECTIONS_COUNT),
            buses_per_route: parse_or(&lookup, "EMULATOR_BUSES_PER_ROUTE", DEFAULT_BUSES_PER_ROUTE),
            routes_dir,
            step_interval: Duration::from_millis(parse_or(&lookup, "EMULATOR_STEP_INTERVAL_MS", DEFAULT_STEP_INTERVAL_MS)),
            retry_delay: Duration::from_millis(parse_or(&lookup, "EMULATOR_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)),
            channel_capacity: parse_or(&lookup, "EMULATOR_CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY),
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
