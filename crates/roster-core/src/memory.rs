//! In-memory adapters using DashMap
//!
//! Stand-ins for Redis and PostgreSQL when running without external services.

use crate::ports::{RecordCache, ReferenceSource, StudentStore};
use crate::supply::ReferenceData;
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use roster_types::{NewStudent, Student, StudentPatch};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Simple in-memory cache with optional TTL
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
    ttl: Option<Duration>,
}

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            ttl: None,
        }
    }

    /// Entries written by this cache expire after `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Check if key exists
    pub fn exists(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let expired = {
            let entry = self.data.get(key)?;
            match entry.expires_at {
                Some(expires) if Instant::now() > expires => true,
                _ => return Some(entry.value.clone()),
            }
        };

        if expired {
            self.data.remove(key);
        }
        None
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

/// Student table held in memory; ids start at 1 like a serial column
pub struct MemoryStudentStore {
    rows: DashMap<i32, Student>,
    next_id: AtomicI32,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl Default for MemoryStudentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert_student(&self, student: &NewStudent) -> Result<Student> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = Student {
            id,
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
            created_at: Utc::now(),
        };
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn get_student(&self, id: i32) -> Result<Option<Student>> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn update_student(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>> {
        Ok(self.rows.get_mut(&id).map(|mut row| {
            patch.apply(row.value_mut());
            row.value().clone()
        }))
    }

    async fn delete_student(&self, id: i32) -> Result<bool> {
        Ok(self.rows.remove(&id).is_some())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut rows: Vec<Student> = self.rows.iter().map(|row| row.value().clone()).collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}

/// Fixed reference tables
pub struct MemoryReferenceSource {
    references: ReferenceData,
}

impl MemoryReferenceSource {
    pub fn new(references: ReferenceData) -> Self {
        Self { references }
    }
}

#[async_trait]
impl ReferenceSource for MemoryReferenceSource {
    async fn load_references(&self) -> Result<ReferenceData> {
        Ok(self.references.clone())
    }
}
