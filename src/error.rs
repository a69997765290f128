use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type.
///
/// Traversal-internal conditions (missing records, absent properties, cyclic
/// relationship graphs) are absorbed inside the walk algorithms and never
/// surface here; this type covers the configuration and ingestion surface,
/// plus the metadata-index collaborator boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum StemmaError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Metadata index unavailable: {0}")]
    Index(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<io::Error> for StemmaError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => StemmaError::NotFound(format!("{x}")),
            _ => StemmaError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<serde_yaml::Error> for StemmaError {
    fn from(src: serde_yaml::Error) -> StemmaError {
        StemmaError::Serialization(format!("Yaml deserialization error: {src}"))
    }
}

impl From<toml::de::Error> for StemmaError {
    fn from(src: toml::de::Error) -> StemmaError {
        StemmaError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for StemmaError {
    fn from(src: toml::ser::Error) -> StemmaError {
        StemmaError::Serialization(format!("Toml serialization error: {src}"))
    }
}
