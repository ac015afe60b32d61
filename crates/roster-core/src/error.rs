//! Error types for Roster

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RosterError {
    fn from(e: serde_json::Error) -> Self {
        RosterError::Serialization(e.to_string())
    }
}

impl From<quick_xml::de::DeError> for RosterError {
    fn from(e: quick_xml::de::DeError) -> Self {
        RosterError::Xml(e.to_string())
    }
}

impl From<quick_xml::Error> for RosterError {
    fn from(e: quick_xml::Error) -> Self {
        RosterError::Xml(e.to_string())
    }
}
