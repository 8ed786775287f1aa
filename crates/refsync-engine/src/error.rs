//! Error types for refsync-engine

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rewriting a file
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch '{locator}'")]
    Fetch {
        locator: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl Error {
    pub fn fetch(
        locator: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            locator: locator.into(),
            source: Box::new(source),
        }
    }
}
