//! CLI commands

pub mod schema;
pub mod students;
pub mod supply;
