use thiserror::Error;

/// Result type for snippet operations
pub type Result<T> = std::result::Result<T, SnippetError>;

/// Errors produced while reading snippet sources.
///
/// The loader turns every one of these into a `Malformed` outcome; they are
/// never returned from aggregation.
#[derive(Error, Debug)]
pub enum SnippetError {
    /// Script source could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Script uses a construct that cannot be read without executing it
    #[error("Unsupported expression `{kind}` at line {line}")]
    Unsupported { kind: String, line: usize },

    /// Malformed string or number literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SnippetError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn unsupported(kind: impl Into<String>, line: usize) -> Self {
        Self::Unsupported {
            kind: kind.into(),
            line,
        }
    }

    pub fn invalid_literal(msg: impl Into<String>) -> Self {
        Self::InvalidLiteral(msg.into())
    }

    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
