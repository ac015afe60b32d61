//! Redis-backed record cache

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use roster_core::ports::RecordCache;
use roster_core::RosterError;
use std::time::Duration;

pub struct RedisCache {
    client: redis::Client,
    ttl: Option<Duration>,
}

fn cache_err(e: redis::RedisError) -> RosterError {
    RosterError::Cache(e.to_string())
}

impl RedisCache {
    /// Validates the URL; no connection is made until the first call
    pub fn new(url: &str, ttl: Option<Duration>) -> Result<Self> {
        let client = redis::Client::open(url)
            .with_context(|| format!("Invalid Redis URL: {}", url))?;
        Ok(Self { client, ttl })
    }

    async fn connection(&self) -> roster_core::Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(cache_err)
    }
}

#[async_trait]
impl RecordCache for RedisCache {
    async fn get(&self, key: &str) -> roster_core::Result<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(cache_err)
    }

    async fn set(&self, key: &str, value: String) -> roster_core::Result<()> {
        let mut conn = self.connection().await?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = self.ttl {
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }

        cmd.query_async::<_, ()>(&mut conn).await.map_err(cache_err)
    }

    async fn delete(&self, key: &str) -> roster_core::Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(cache_err)
    }
}
