// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use herostats_kernel::config::MAX_TEAM_SIZE;
use herostats_kernel::{Roster, RosterError};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::store::RetryPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("unknown STORE_BACKEND {0:?} (expected memory or rtdb)")]
    UnknownBackend(String),
    #[error("STORE_BACKEND=rtdb requires RTDB_URL")]
    MissingRtdbUrl,
    #[error("failed to read roster file: {0}")]
    RosterFile(#[from] std::io::Error),
    #[error("failed to parse roster file: {0}")]
    RosterJson(#[from] serde_json::Error),
    #[error("invalid roster: {0}")]
    Roster(#[from] RosterError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Rtdb,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "rtdb" | "firebase" => Ok(StoreBackend::Rtdb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct RosterFile {
    maps: Vec<String>,
    heroes: Vec<String>,
}

#[derive(Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
    pub rtdb_url: Option<String>,
    pub rtdb_auth: Option<String>,
    pub txn_max_attempts: u32,
    pub txn_backoff_ms: u64,
    pub update_concurrency: usize,
    pub max_team_size: usize,
    pub snapshot_path: Option<PathBuf>,
    pub auto_snapshot_interval_secs: Option<u64>,
    pub static_dir: Option<PathBuf>,
    pub roster_path: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            backend: StoreBackend::Memory,
            rtdb_url: None,
            rtdb_auth: None,
            txn_max_attempts: 25,
            txn_backoff_ms: 5,
            update_concurrency: 16,
            max_team_size: MAX_TEAM_SIZE,
            snapshot_path: None,
            auto_snapshot_interval_secs: None,
            static_dir: None,
            roster_path: None,
        }
    }
}

// Auth token stays out of logs.
impl std::fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeConfig")
            .field("bind_addr", &self.bind_addr)
            .field("backend", &self.backend)
            .field("rtdb_url", &self.rtdb_url)
            .field("rtdb_auth", &self.rtdb_auth.as_ref().map(|_| "<redacted>"))
            .field("txn_max_attempts", &self.txn_max_attempts)
            .field("txn_backoff_ms", &self.txn_backoff_ms)
            .field("update_concurrency", &self.update_concurrency)
            .field("max_team_size", &self.max_team_size)
            .field("snapshot_path", &self.snapshot_path)
            .field("auto_snapshot_interval_secs", &self.auto_snapshot_interval_secs)
            .field("static_dir", &self.static_dir)
            .field("roster_path", &self.roster_path)
            .finish()
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, starting at the defaults. Empty
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        let ip = match var("BIND_ADDR") {
            Some(v) => parse::<IpAddr>("BIND_ADDR", &v)?,
            None => cfg.bind_addr.ip(),
        };
        let port = match var("PORT") {
            Some(v) => parse::<u16>("PORT", &v)?,
            None => cfg.bind_addr.port(),
        };
        cfg.bind_addr = SocketAddr::new(ip, port);

        if let Some(v) = var("STORE_BACKEND") {
            cfg.backend = v.parse()?;
        }
        cfg.rtdb_url = var("RTDB_URL");
        cfg.rtdb_auth = var("RTDB_AUTH");
        if let Some(v) = var("TXN_MAX_ATTEMPTS") {
            cfg.txn_max_attempts = parse("TXN_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = var("TXN_BACKOFF_MS") {
            cfg.txn_backoff_ms = parse("TXN_BACKOFF_MS", &v)?;
        }
        if let Some(v) = var("UPDATE_CONCURRENCY") {
            cfg.update_concurrency = parse("UPDATE_CONCURRENCY", &v)?;
        }
        if let Some(v) = var("MAX_TEAM_SIZE") {
            cfg.max_team_size = parse("MAX_TEAM_SIZE", &v)?;
        }
        cfg.snapshot_path = var("SNAPSHOT_PATH").map(PathBuf::from);
        if let Some(v) = var("SNAPSHOT_INTERVAL_SECS") {
            cfg.auto_snapshot_interval_secs = Some(parse("SNAPSHOT_INTERVAL_SECS", &v)?);
        }
        cfg.static_dir = var("STATIC_DIR").map(PathBuf::from);
        cfg.roster_path = var("ROSTER_PATH").map(PathBuf::from);

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StoreBackend::Rtdb && self.rtdb_url.is_none() {
            return Err(ConfigError::MissingRtdbUrl);
        }
        if self.txn_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "TXN_MAX_ATTEMPTS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.update_concurrency == 0 {
            return Err(ConfigError::Invalid {
                var: "UPDATE_CONCURRENCY",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_team_size == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_TEAM_SIZE",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.txn_max_attempts,
            backoff: Duration::from_millis(self.txn_backoff_ms),
        }
    }

    /// The roster file named by `roster_path`, or the built-in roster.
    pub fn load_roster(&self) -> Result<Roster, ConfigError> {
        let Some(path) = &self.roster_path else {
            return Ok(Roster::standard());
        };
        let bytes = std::fs::read(path)?;
        let file: RosterFile = serde_json::from_slice(&bytes)?;
        Ok(Roster::new(file.maps, file.heroes)?)
    }
}
