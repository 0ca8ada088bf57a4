//! Configuration for the lobby TCP server.
//!
//! Defaults can be overridden with a few environment variables:
//!
//! - `LOBBY_BIND_ADDR`  (default: "0.0.0.0")
//! - `LOBBY_PORT`       (default: "8080")
//! - `LOBBY_SLOT_REUSE` (default: "carry-over"; or "reset")

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result};
use lobby_core::SlotReuse;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// What a freed slot looks like to the next player who takes it.
    pub slot_reuse: SlotReuse,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            slot_reuse: SlotReuse::CarryOver,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let bind_addr = env::var("LOBBY_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = read_env_or_default("LOBBY_PORT", defaults.port)?;
        let slot_reuse = read_env_or_default("LOBBY_SLOT_REUSE", defaults.slot_reuse)?;

        Ok(Config {
            bind_addr,
            port,
            slot_reuse,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {val:?}")),
        Err(_) => Ok(default),
    }
}
