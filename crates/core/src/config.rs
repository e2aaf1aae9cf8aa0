//! Service configuration
//!
//! Resolved once at start-up from environment variables and handed to the
//! resolver and HTTP layer. Nothing reads the environment after that.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path_rewrite::DEFAULT_BASE_URL;

pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_BASE_URL: &str = "NGINX_BASE_URL";
pub const ENV_MAX_BATCH_SIZE: &str = "MAX_BATCH_SIZE";
pub const ENV_PORT: &str = "DATASET_SERVER_PORT";
pub const ENV_BIND: &str = "DATASET_SERVER_BIND";

pub const DEFAULT_DATABASE_PATH: &str = "/app/Alias_Storage.db";
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PORT: u16 = 9006;
pub const DEFAULT_BIND: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite file holding the alias table
    pub database_path: PathBuf,
    /// Prefix for every public URL, without trailing slash
    pub base_url: String,
    pub max_batch_size: usize,
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_BATCH_SIZE) {
            let size: usize = parse_var(ENV_MAX_BATCH_SIZE, &raw)?;
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_MAX_BATCH_SIZE,
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.max_batch_size = size;
        }
        if let Some(raw) = lookup(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &raw)?;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            config.bind_address = bind;
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
