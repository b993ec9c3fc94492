use thiserror::Error;

use super::filename::FilenameError;

/// Errors that can occur during file store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No file is stored under the requested name.
    #[error("file not found: {0}")]
    NotFound(String),
    /// The filename failed validation before touching the filesystem.
    #[error("{0}")]
    InvalidName(#[from] FilenameError),
    /// The file exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
