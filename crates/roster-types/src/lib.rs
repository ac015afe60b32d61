//! Roster Types - Pure record definitions
//!
//! This crate contains only plain data types with no storage or runtime
//! dependencies, shared by the core services and the CLI adapters.

pub mod student;
pub mod supply;

pub use student::*;
pub use supply::*;
