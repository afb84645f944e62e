use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::properties::NavKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum NavError {
    #[error("Node not found: {0}")]
    NotFound(NavKey),
    #[error("Parent node not found: {0}")]
    ParentNotFound(NavKey),
    #[error("Node already exists: {0}")]
    AlreadyExists(NavKey),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Record source error: {0}")]
    Source(String),
    #[error("Lock acquisition failed: {0}")]
    Lock(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("File System error: {0}")]
    Io(String),
}

impl NavError {
    /// True for the errors that reference a key absent from the forest being addressed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavError::NotFound(_) | NavError::ParentNotFound(_))
    }
}

impl From<toml::de::Error> for NavError {
    fn from(src: toml::de::Error) -> NavError {
        NavError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for NavError {
    fn from(src: toml::ser::Error) -> NavError {
        NavError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<uuid::Error> for NavError {
    fn from(src: uuid::Error) -> NavError {
        NavError::Serialization(format!("UUID conversion failed: {src}"))
    }
}

impl From<io::Error> for NavError {
    fn from(x: io::Error) -> Self {
        NavError::Io(format!("IOError: {} ({x})", x.kind()))
    }
}
