//! Errors raised while resolving, reading, or writing configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config file at {0}")]
    NotFound(PathBuf),

    /// The file is not valid JSON5 or does not match the schema.
    #[error("Invalid config file: {0}")]
    Json5(String),

    #[error("Could not serialize config: {0}")]
    Serialize(String),

    /// One or more values are out of range; every problem is listed.
    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
