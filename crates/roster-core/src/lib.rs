//! Roster Core Library
//!
//! Storage ports, the cached student service and the supply join reporter.

// Re-export pure types from roster-types
pub use roster_types::*;

pub mod error;
pub mod memory;
pub mod ports;
pub mod students;
pub mod supply;

pub use error::{Result, RosterError};
pub use memory::{MemoryCache, MemoryReferenceSource, MemoryStudentStore};
pub use students::StudentService;
