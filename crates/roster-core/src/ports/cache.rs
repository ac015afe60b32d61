//! Key-value cache trait

use crate::Result;
use async_trait::async_trait;

/// String key-value cache mirroring store rows
#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
