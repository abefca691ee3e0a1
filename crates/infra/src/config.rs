//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `APP_NAME` | `msstudyApp` | prefix of the `X-<app>-*` alert headers |
//! | `USE_PERSISTENT_STORES` | `false` | `true` selects Postgres |
//! | `DATABASE_URL` | — | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | pool size, at least 1 |

use std::net::SocketAddr;

use anyhow::{Context, bail};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_APP_NAME: &str = "msstudyApp";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which backing store the process wires in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub app_name: String,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 8080).into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            store: StoreConfig::InMemory,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let app_name = lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        if app_name.is_empty() || !app_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            bail!("APP_NAME must be non-empty and header-safe, got {app_name:?}");
        }

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => v
                .parse::<bool>()
                .with_context(|| format!("USE_PERSISTENT_STORES must be true or false, got {v:?}"))?,
            None => false,
        };

        let store = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(v) => v
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {v:?}"))?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreConfig::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            app_name,
            store,
        })
    }
}
