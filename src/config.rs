//! Environment-driven runtime configuration, loaded once at startup.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};

pub const DEFAULT_PLAYER_API_URL: &str = "https://info.example-game-api.com/api/player";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub addr: SocketAddr,
    pub admin_secret: AdminSecretSource,
    pub player_api_url: String,
    pub player_api_timeout: Duration,
    pub sync_interval: Duration,
    /// Scheduled sweeps skip uids fetched more recently than this. Zero disables the skip.
    pub min_refetch: Duration,
}

/// Where the admin shared secret comes from.
#[derive(Clone)]
pub enum AdminSecretSource {
    Hash(String),
    Plain(String),
}

impl std::fmt::Debug for AdminSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminSecretSource::Hash(_) => f.write_str("Hash(..)"),
            AdminSecretSource::Plain(_) => f.write_str("Plain(..)"),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT").or_else(|| get("SERVER_PORT")) {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("invalid port: {raw}"))?,
            None => 3000,
        };
        let addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen address {host}:{port}"))?;

        let admin_secret = match (get("ADMIN_PASSWORD_HASH"), get("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminSecretSource::Hash(hash),
            (None, Some(plain)) => AdminSecretSource::Plain(plain),
            (None, None) => {
                return Err(anyhow!("one of ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set"))
            }
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5)?,
            addr,
            admin_secret,
            player_api_url: get("PLAYER_API_URL").unwrap_or_else(|| DEFAULT_PLAYER_API_URL.to_string()),
            player_api_timeout: Duration::from_secs(parse_or(&get, "PLAYER_API_TIMEOUT_SECS", 10)?),
            sync_interval: Duration::from_secs(parse_or(&get, "SYNC_INTERVAL_SECS", 600)?),
            min_refetch: Duration::from_secs(parse_or(&get, "SYNC_MIN_REFETCH_SECS", 0)?),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}
