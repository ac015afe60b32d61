//! Cached student service
//!
//! Writes go through to the cache after the store accepts them, reads try the
//! cache first, and deletes always drop the cache entry.

use crate::ports::{RecordCache, StudentStore};
use crate::Result;
use roster_types::{student_cache_key, NewStudent, Student, StudentPatch};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StudentService {
    store: Arc<dyn StudentStore>,
    cache: Arc<dyn RecordCache>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>, cache: Arc<dyn RecordCache>) -> Self {
        Self { store, cache }
    }

    pub async fn create(&self, name: &str, email: &str, course: &str) -> Result<Student> {
        info!("Creating student: name={}, course={}", name, course);

        let student = self
            .store
            .insert_student(&NewStudent::new(name, email, course))
            .await?;

        self.cache_student(&student).await?;

        Ok(student)
    }

    pub async fn read(&self, id: i32) -> Result<Option<Student>> {
        // Try cache first
        let key = student_cache_key(id);
        if let Some(data) = self.cache.get(&key).await? {
            match serde_json::from_str::<Student>(&data) {
                Ok(student) => {
                    debug!("Cache hit for {}", key);
                    return Ok(Some(student));
                }
                Err(e) => warn!("Discarding unreadable cache entry {}: {}", key, e),
            }
        }

        // Fall back to the store
        debug!("Cache miss for {}", key);
        let student = self.store.get_student(id).await?;
        if let Some(ref student) = student {
            self.cache_student(student).await?;
        }

        Ok(student)
    }

    pub async fn update(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>> {
        if patch.is_empty() {
            debug!("Empty update for student {}, reading instead", id);
            return self.read(id).await;
        }

        info!("Updating student {}", id);
        let student = self.store.update_student(id, patch).await?;
        if let Some(ref student) = student {
            self.cache_student(student).await?;
        }

        Ok(student)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        info!("Deleting student {}", id);

        let deleted = self.store.delete_student(id).await?;

        // Invalidate regardless of whether a row existed
        self.cache.delete(&student_cache_key(id)).await?;

        Ok(deleted)
    }

    /// All students ordered by id, always from the store
    pub async fn list(&self) -> Result<Vec<Student>> {
        self.store.list_students().await
    }

    async fn cache_student(&self, student: &Student) -> Result<()> {
        let json = serde_json::to_string(student)?;
        self.cache.set(&student_cache_key(student.id), json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCache, MemoryStudentStore};

    struct Fixture {
        service: StudentService,
        store: Arc<MemoryStudentStore>,
        cache: Arc<MemoryCache>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStudentStore::new());
        let cache = Arc::new(MemoryCache::new());
        let service = StudentService::new(store.clone(), cache.clone());
        Fixture {
            service,
            store,
            cache,
        }
    }

    #[tokio::test]
    async fn test_read_after_create() -> Result<()> {
        let f = fixture();
        let created = f
            .service
            .create("Ana", "ana@example.com", "Physics")
            .await?;

        assert!(f.cache.exists(&student_cache_key(created.id)));
        assert_eq!(f.service.read(created.id).await?, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_miss_populates_cache() -> Result<()> {
        let f = fixture();
        let row = f
            .store
            .insert_student(&NewStudent::new("Bo", "bo@example.com", "Art"))
            .await?;
        let key = student_cache_key(row.id);
        assert!(!f.cache.exists(&key));

        assert_eq!(f.service.read(row.id).await?, Some(row));
        assert!(f.cache.exists(&key));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_absent_is_none() -> Result<()> {
        let f = fixture();
        assert_eq!(f.service.read(99).await?, None);
        assert!(!f.cache.exists(&student_cache_key(99)));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_falls_back() -> Result<()> {
        let f = fixture();
        let created = f.service.create("Cy", "cy@example.com", "Law").await?;
        f.cache
            .set(&student_cache_key(created.id), "not json".to_string())
            .await?;

        assert_eq!(f.service.read(created.id).await?, Some(created.clone()));

        let cached = f.cache.get(&student_cache_key(created.id)).await?.unwrap();
        assert_eq!(serde_json::from_str::<Student>(&cached)?, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() -> Result<()> {
        let f = fixture();
        let created = f.service.create("Di", "di@example.com", "Music").await?;

        assert!(f.service.delete(created.id).await?);
        assert!(!f.cache.exists(&student_cache_key(created.id)));
        assert_eq!(f.service.read(created.id).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_absent_still_invalidates() -> Result<()> {
        let f = fixture();
        let key = student_cache_key(5);
        f.cache.set(&key, "stale".to_string()).await?;

        assert!(!f.service.delete(5).await?);
        assert!(!f.cache.exists(&key));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_update_is_read() -> Result<()> {
        let f = fixture();
        let created = f.service.create("Ed", "ed@example.com", "History").await?;

        let updated = f.service.update(created.id, &StudentPatch::default()).await?;
        assert_eq!(updated, f.service.read(created.id).await?);
        assert_eq!(updated, Some(created));

        assert_eq!(f.service.update(42, &StudentPatch::default()).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() -> Result<()> {
        let f = fixture();
        let created = f.service.create("Fa", "fa@example.com", "Biology").await?;

        let patch = StudentPatch {
            email: Some("fa@school.org".to_string()),
            ..Default::default()
        };
        let updated = f.service.update(created.id, &patch).await?.unwrap();

        assert_eq!(updated.email, "fa@school.org");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.course, created.course);
        assert_eq!(updated.id, created.id);

        // Cache reflects the new value
        assert_eq!(f.service.read(created.id).await?, Some(updated));

        Ok(())
    }

    #[tokio::test]
    async fn test_values_are_stored_as_typed() -> Result<()> {
        let f = fixture();
        let created = f.service.create("", "", "").await?;
        assert_eq!(created.name, "");
        assert_eq!(f.service.read(created.id).await?, Some(created.clone()));

        let patch = StudentPatch::from_input(" Jo ", "", "  ");
        let updated = f.service.update(created.id, &patch).await?.unwrap();
        assert_eq!(updated.name, " Jo ");
        assert_eq!(updated.email, "");
        assert_eq!(updated.course, "  ");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_absent_is_none() -> Result<()> {
        let f = fixture();
        let patch = StudentPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(f.service.update(7, &patch).await?, None);
        assert!(!f.cache.exists(&student_cache_key(7)));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_bypasses_cache() -> Result<()> {
        let f = fixture();
        let first = f.service.create("Hu", "hu@example.com", "Math").await?;
        let second = f.service.create("Io", "io@example.com", "Math").await?;

        // A poisoned cache entry must not leak into the listing
        f.cache
            .set(&student_cache_key(first.id), "not json".to_string())
            .await?;

        let listed = f.service.list().await?;
        assert_eq!(listed, vec![first, second]);
        assert!(listed.iter().all(|s| s.id > 0));

        Ok(())
    }
}
