use thiserror::Error;

/// Result type for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors raised while enumerating workspace members.
///
/// Resolution itself never fails; these surface from the lower-level helpers
/// and are logged by the resolver before it moves on.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// A workspace glob is not valid glob syntax
    #[error("Invalid workspace glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Blocking enumeration task was cancelled or panicked
    #[error("Glob enumeration task failed: {0}")]
    Task(String),
}

impl WorkspaceError {
    pub fn invalid_glob(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
