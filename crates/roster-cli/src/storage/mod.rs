//! Storage layer
//!
//! PostgreSQL for the relational tables, Redis (or an in-memory map) for the
//! student cache.

pub mod cache;
pub mod db;

pub use cache::RedisCache;
pub use db::{Database, PgReferenceSource, PgStudentStore};

use crate::config::{CacheBackend, Settings};
use anyhow::Result;
use roster_core::ports::RecordCache;
use roster_core::MemoryCache;
use std::sync::Arc;
use tracing::info;

/// Build the configured cache backend
pub fn open_cache(settings: &Settings) -> Result<Arc<dyn RecordCache>> {
    let ttl = settings.cache_ttl();

    match settings.cache_backend {
        CacheBackend::Redis => {
            info!("Using Redis cache at {}", settings.redis_url);
            Ok(Arc::new(RedisCache::new(&settings.redis_url, ttl)?))
        }
        CacheBackend::Memory => {
            info!("Using in-memory cache");
            Ok(Arc::new(match ttl {
                Some(ttl) => MemoryCache::with_ttl(ttl),
                None => MemoryCache::new(),
            }))
        }
    }
}
