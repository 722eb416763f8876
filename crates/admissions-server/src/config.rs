//! Server configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `admissions.toml` next to the binary's working directory, then
//! `ADMISSIONS_*` environment variables (a `.env` file is loaded first).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE_STEM: &str = "admissions";
pub const ENV_PREFIX: &str = "ADMISSIONS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "admissions.db";
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            busy_timeout_ms: admissions_core::db::DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from `admissions.toml` and the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::load_from(CONFIG_FILE_STEM)
    }

    /// Load using `file_stem` as the optional configuration file.
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = Self::default();
        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path.to_string_lossy().into_owned())?
            .set_default("busy_timeout_ms", defaults.busy_timeout_ms)?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read server configuration")?
            .try_deserialize()
            .context("Invalid server configuration")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
