//! Storage traits for persistence

use crate::supply::ReferenceData;
use crate::Result;
use async_trait::async_trait;
use roster_types::{NewStudent, Student, StudentPatch};

/// Student store
///
/// Implementations hold each connection only for the duration of one call.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a row and return it as persisted (with generated id)
    async fn insert_student(&self, student: &NewStudent) -> Result<Student>;
    async fn get_student(&self, id: i32) -> Result<Option<Student>>;
    /// Apply a non-empty patch; `None` when the id does not exist
    async fn update_student(&self, id: i32, patch: &StudentPatch) -> Result<Option<Student>>;
    /// Returns whether a row was removed
    async fn delete_student(&self, id: i32) -> Result<bool>;
    /// All rows ordered by id
    async fn list_students(&self) -> Result<Vec<Student>>;
}

/// Source of the supplier/part/project reference tables
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn load_references(&self) -> Result<ReferenceData>;
}
