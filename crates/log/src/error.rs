/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The level directive could not be parsed.
    #[error("invalid filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

impl LogError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter(_) => "LOG_FILTER",
            Self::AlreadyInitialized => "LOG_ALREADY_INITIALIZED",
        }
    }
}

/// Result type for logger operations.
pub type LogResult<T> = Result<T, LogError>;
