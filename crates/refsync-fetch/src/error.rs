//! Error types for refsync-fetch
//!
//! `Error` is `Clone` because a failed fetch is cached alongside successful
//! ones: every later request for the same locator must receive the same
//! failure without re-fetching. Underlying errors are therefore carried as
//! messages rather than sources.

use std::path::PathBuf;

/// Result type for refsync-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching referenced content
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize HTTP client: {message}")]
    Client { message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl Error {
    pub fn request(url: impl ToString, source: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.to_string(),
            message: source.to_string(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
