//! Configuration management
//!
//! Settings come from environment variables layered over built-in defaults.
//! A `.env` file in the working directory, if present, is loaded into the
//! environment first; variables already set in the process win.

use anyhow::{Context, Result};
use ::config::{Config, Environment};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Which key-value cache backs the student service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "pghost")]
    pub pg_host: String,
    #[serde(rename = "pgport")]
    pub pg_port: u16,
    #[serde(rename = "pguser")]
    pub pg_user: String,
    #[serde(rename = "pgpassword")]
    pub pg_password: String,
    #[serde(rename = "pgdatabase")]
    pub pg_database: String,
    pub redis_url: String,
    pub cache_backend: CacheBackend,
    pub cache_ttl_secs: Option<u64>,
    pub schema_path: PathBuf,
    pub supply_file: PathBuf,
}

impl Settings {
    /// Load settings from `.env` and the process environment
    pub fn load() -> Result<Self> {
        Self::load_with_dotenv(None)
    }

    fn load_with_dotenv(dotenv_path: Option<&Path>) -> Result<Self> {
        let loaded = match dotenv_path {
            Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
            None => dotenvy::dotenv(),
        };

        match loaded {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(e).context("Failed to read .env file"),
        }

        Self::from_environment(Environment::default())
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("pghost", "localhost")?
            .set_default("pgport", 5432)?
            .set_default("pguser", "postgres")?
            .set_default("pgpassword", "postgres")?
            .set_default("pgdatabase", "demo_db")?
            .set_default("redis_url", "redis://localhost:6379/0")?
            .set_default("cache_backend", "redis")?
            .set_default("schema_path", "db.sql")?
            .set_default("supply_file", "data/supply.xml")?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn pg_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.pg_host)
            .port(self.pg_port)
            .username(&self.pg_user)
            .password(&self.pg_password)
            .database(&self.pg_database)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}
