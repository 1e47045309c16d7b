use thiserror::Error;

/// Result type for import reconciliation
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors raised by the reconciler and by edit application
#[derive(Error, Debug)]
pub enum ImportError {
    /// No grammar for this file type or language id
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// The text no longer matches the one the edits were computed against
    #[error("Edits are stale: computed for {expected}, text is now {actual}")]
    StaleEdits { expected: String, actual: String },

    /// Two edits touch the same bytes
    #[error("Overlapping edits at {first:?} and {second:?}")]
    OverlappingEdits {
        first: (usize, usize),
        second: (usize, usize),
    },

    /// Edit range outside the text or off a character boundary
    #[error("Invalid edit range {start}..{end} for text of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },
}

impl ImportError {
    /// Create an unsupported dialect error
    pub fn unsupported_dialect(what: impl Into<String>) -> Self {
        Self::UnsupportedDialect(what.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
