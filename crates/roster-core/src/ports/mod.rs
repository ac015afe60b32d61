//! Ports (interfaces) for the storage backends

pub mod cache;
pub mod storage;

pub use cache::RecordCache;
pub use storage::{ReferenceSource, StudentStore};
