//! Error type for the refsync CLI

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user by the CLI
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] refsync_engine::Error),

    #[error(transparent)]
    Fs(#[from] refsync_fs::Error),

    #[error(transparent)]
    Fetch(#[from] refsync_fetch::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
